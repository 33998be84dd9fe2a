//! Unit tests for configuration, component, and plugin injection.

use std::sync::Arc;

use cardboard_config::{ConfigStore, ConfigValue};
use rstest::{fixture, rstest};

use super::*;
use crate::host::{Invoker, PluginTable};
use crate::tests::support::{
    Bank, Economy, Motd, Receipt, RecordingInvoker, Shop, Vault, bank, config_store, database,
    empty_registry, loaded_registry, shop_config,
};

/// Every scalar kind, pre-filled with non-zero values.
struct Everything {
    flag: Setting<bool>,
    tiny: Setting<i8>,
    small: Setting<i16>,
    int: Setting<i32>,
    long: Setting<i64>,
    single: Setting<f32>,
    double: Setting<f64>,
    text: Setting<String>,
    raw: Setting<Option<ConfigValue>>,
}

impl Default for Everything {
    fn default() -> Self {
        Self {
            flag: Setting::new(true),
            tiny: Setting::new(1),
            small: Setting::new(2),
            int: Setting::new(3),
            long: Setting::new(4),
            single: Setting::new(5.0),
            double: Setting::new(6.0),
            text: Setting::new("seven".to_owned()),
            raw: Setting::new(Some(ConfigValue::Integer(8))),
        }
    }
}

impl Everything {
    fn under(&self, prefix: &'static str) -> Vec<Binding<'_>> {
        let key = |name: &str| ConfigKey::new(format!("{prefix}.{name}"));
        vec![
            Binding::config("flag", key("flag"), &self.flag),
            Binding::config("tiny", key("tiny"), &self.tiny),
            Binding::config("small", key("small"), &self.small),
            Binding::config("int", key("int"), &self.int),
            Binding::config("long", key("long"), &self.long),
            Binding::config("single", key("single"), &self.single),
            Binding::config("double", key("double"), &self.double),
            Binding::config("text", key("text"), &self.text),
            Binding::config("raw", key("raw"), &self.raw),
        ]
    }
}

impl Injectable for Everything {
    fn bindings(&self) -> Vec<Binding<'_>> {
        self.under("missing")
    }
}

#[derive(Default)]
struct Plain {
    greeting: Setting<String>,
    tiny: Setting<i8>,
}

impl Injectable for Plain {
    fn bindings(&self) -> Vec<Binding<'_>> {
        vec![
            Binding::config("greeting", ConfigKey::new("shop.greeting"), &self.greeting),
            Binding::config("tiny", ConfigKey::new("shop.overflow"), &self.tiny),
        ]
    }
}

#[fixture]
fn registry() -> ComponentRegistry {
    loaded_registry(vec![database(), bank()])
}

mod config_tests {
    use super::*;

    #[rstest]
    fn colored_values_are_translated(registry: ComponentRegistry) {
        let shop = Shop::default();
        registry.injector().inject_config(&shop);
        assert_eq!(shop.greeting.get(), "§aWelcome!");
        assert_eq!(shop.slots.get(), 27);
    }

    #[test]
    fn uncolored_values_pass_through_and_narrow() {
        let store = ConfigStore::new(Arc::new(
            shop_config().with("shop.overflow", 300),
        ));
        let registry = ComponentRegistry::new(Arc::new(store), Arc::new(PluginTable::new()));
        let plain = Plain::default();
        registry.injector().inject_config(&plain);
        assert_eq!(plain.greeting.get(), "&aWelcome!");
        assert_eq!(plain.tiny.get(), 44);
    }

    #[rstest]
    fn missing_keys_produce_zero_values(registry: ComponentRegistry) {
        let target = Everything::default();
        registry.injector().inject_config(&target);

        assert!(!target.flag.get());
        assert_eq!(target.tiny.get(), 0);
        assert_eq!(target.small.get(), 0);
        assert_eq!(target.int.get(), 0);
        assert_eq!(target.long.get(), 0);
        assert_eq!(target.single.get().to_bits(), 0.0_f32.to_bits());
        assert_eq!(target.double.get().to_bits(), 0.0_f64.to_bits());
        assert_eq!(target.text.get(), "");
        assert_eq!(target.raw.get(), None);
    }

    #[rstest]
    fn named_sources_are_used(registry: ComponentRegistry) {
        let bank = Bank::default();
        registry.injector().inject_config(&bank);
        assert_eq!(bank.currency.get(), "emeralds");
    }

    #[rstest]
    fn forced_source_overrides_declared_sources(registry: ComponentRegistry) {
        let shop = Shop::default();
        shop.slots.set(9);
        registry.injector().inject_config_from(&shop, "bank.yml");
        assert_eq!(shop.greeting.get(), "");
        assert_eq!(shop.slots.get(), 0);
    }

    #[rstest]
    fn default_file_name_reads_the_default_source(registry: ComponentRegistry) {
        let shop = Shop::default();
        registry.injector().inject_config_from(&shop, "Config.yml");
        assert_eq!(shop.slots.get(), 27);
    }
}

mod component_tests {
    use super::*;

    #[rstest]
    fn capabilities_are_wired(registry: ComponentRegistry) {
        let shop = Shop::default();
        registry
            .injector()
            .inject(&shop, &InjectionContext::new())
            .expect("inject shop");
        let economy = shop.economy.get().expect("economy wired");
        assert_eq!(economy.currency(), "");
    }

    #[test]
    fn unresolvable_components_leave_fields_unset() {
        let registry = empty_registry();
        let shop = Shop::default();
        registry
            .injector()
            .inject_components(&shop, &InjectionContext::new())
            .expect("soft failure");
        assert!(!shop.economy.is_wired());
    }

    #[rstest]
    fn reinjection_overwrites_slots(registry: ComponentRegistry) {
        let receipt = Receipt::default();
        let first: Arc<dyn Invoker> = Arc::new(RecordingInvoker::new("first"));
        let second: Arc<dyn Invoker> = Arc::new(RecordingInvoker::new("second"));
        let injector = registry.injector();

        injector
            .inject_components(&receipt, &InjectionContext::new().with(first))
            .expect("first pass");
        injector
            .inject_components(&receipt, &InjectionContext::new().with(Arc::clone(&second)))
            .expect("second pass");

        let wired = receipt.invoker.get().expect("invoker wired");
        assert!(Arc::ptr_eq(&wired, &second));
    }
}

mod plugin_tests {
    use super::*;

    #[test]
    fn loaded_plugins_are_injected() {
        let plugins = PluginTable::new().with(Arc::new(Vault));
        let registry = ComponentRegistry::new(config_store(), Arc::new(plugins));
        let motd = Motd::default();
        registry
            .injector()
            .inject_components(&motd, &InjectionContext::new())
            .expect("plugin present");
        let plugin = motd.vault.get().expect("vault injected");
        assert_eq!(plugin.name(), "Vault");
        assert!(motd.vault.get_as::<Vault>().is_some());
    }

    #[rstest]
    fn missing_plugins_are_fatal(registry: ComponentRegistry) {
        let motd = Motd::default();
        let err = registry
            .injector()
            .inject_components(&motd, &InjectionContext::new())
            .expect_err("plugin missing");
        assert_eq!(err, InjectionError::external_dependency("vault", "Vault"));
    }
}

#[test]
fn bindings_describe_their_fields() {
    let shop = Shop::default();
    let bindings = shop.bindings();
    let fields: Vec<&str> = bindings.iter().map(Binding::field).collect();
    assert_eq!(fields, vec!["economy", "greeting", "slots"]);

    let economy = bindings.first().expect("economy binding");
    assert_eq!(economy.component_key(), Some(TypeKey::of::<dyn Economy>()));
    let greeting = bindings.get(1).expect("greeting binding");
    assert!(greeting.config_key().is_some_and(ConfigKey::is_colored));
    assert_eq!(greeting.plugin_name(), None);
}
