//! Components, invokers, and builders shared by the unit and behaviour tests.

use std::sync::{Arc, Mutex};

use cardboard_config::{ConfigSection, ConfigStore};

use crate::command::{CommandBuilder, Dispatch, Subcommand};
use crate::component::{Component, ComponentDescriptor};
use crate::error::ConstructionError;
use crate::host::{ExternalPlugin, Host, Invoker, Listener, Player, PluginTable};
use crate::inject::{Binding, ConfigKey, Injectable, PluginRef, Setting, Wired};
use crate::registry::ComponentRegistry;

pub(crate) trait Economy: Send + Sync {
    fn currency(&self) -> String;
}

#[derive(Default)]
pub(crate) struct Database {
    pub(crate) url: Setting<String>,
}

impl Injectable for Database {
    fn bindings(&self) -> Vec<Binding<'_>> {
        vec![Binding::config(
            "url",
            ConfigKey::new("database.url"),
            &self.url,
        )]
    }
}

impl Component for Database {}

#[derive(Default)]
pub(crate) struct Bank {
    pub(crate) database: Wired<Database>,
    pub(crate) currency: Setting<String>,
}

impl Injectable for Bank {
    fn bindings(&self) -> Vec<Binding<'_>> {
        vec![
            Binding::component("database", &self.database),
            Binding::config(
                "currency",
                ConfigKey::new("currency").from_source("bank.yml"),
                &self.currency,
            ),
        ]
    }
}

impl Component for Bank {}

impl Economy for Bank {
    fn currency(&self) -> String {
        self.currency.get()
    }
}

#[derive(Default)]
pub(crate) struct Shop {
    pub(crate) economy: Wired<dyn Economy>,
    pub(crate) greeting: Setting<String>,
    pub(crate) slots: Setting<i32>,
    pub(crate) initialised: Setting<bool>,
}

impl Injectable for Shop {
    fn bindings(&self) -> Vec<Binding<'_>> {
        vec![
            Binding::component("economy", &self.economy),
            Binding::config(
                "greeting",
                ConfigKey::new("shop.greeting").colored(),
                &self.greeting,
            ),
            Binding::config("slots", ConfigKey::new("shop.slots"), &self.slots),
        ]
    }
}

impl Component for Shop {
    fn init(&self) -> bool {
        self.initialised.set(true);
        self.economy.is_wired()
    }
}

/// Instanced component that captures the invoker from its context.
#[derive(Default)]
pub(crate) struct Receipt {
    pub(crate) economy: Wired<dyn Economy>,
    pub(crate) invoker: Wired<dyn Invoker>,
}

impl Injectable for Receipt {
    fn bindings(&self) -> Vec<Binding<'_>> {
        vec![
            Binding::component("economy", &self.economy),
            Binding::component("invoker", &self.invoker),
        ]
    }
}

impl Component for Receipt {}

/// Instanced component that requires an instance of itself.
#[derive(Default)]
pub(crate) struct Ouroboros {
    pub(crate) tail: Wired<Ouroboros>,
}

impl Injectable for Ouroboros {
    fn bindings(&self) -> Vec<Binding<'_>> {
        vec![Binding::component("tail", &self.tail)]
    }
}

impl Component for Ouroboros {}

/// Economies with fixed currencies, used to pin resolution tie-breaks.
#[derive(Default)]
pub(crate) struct Mint;

impl Injectable for Mint {}
impl Component for Mint {}

impl Economy for Mint {
    fn currency(&self) -> String {
        "mint".to_owned()
    }
}

#[derive(Default)]
pub(crate) struct Treasury;

impl Injectable for Treasury {}
impl Component for Treasury {}

impl Economy for Treasury {
    fn currency(&self) -> String {
        "treasury".to_owned()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Broken;

impl Injectable for Broken {}
impl Component for Broken {}

#[derive(Debug, Default)]
pub(crate) struct NeedsBroken;

impl Injectable for NeedsBroken {}
impl Component for NeedsBroken {}

#[derive(Debug, Default)]
pub(crate) struct Motd {
    pub(crate) vault: PluginRef,
}

impl Injectable for Motd {
    fn bindings(&self) -> Vec<Binding<'_>> {
        vec![Binding::plugin("vault", "Vault", &self.vault)]
    }
}

impl Component for Motd {}

pub(crate) struct Vault;

/// Listener greeting joining players with the shop's greeting.
#[derive(Default)]
pub(crate) struct Greeter {
    pub(crate) greeting: Setting<String>,
    pub(crate) shop: Wired<Shop>,
}

impl Injectable for Greeter {
    fn bindings(&self) -> Vec<Binding<'_>> {
        vec![
            Binding::config(
                "greeting",
                ConfigKey::new("shop.greeting").colored(),
                &self.greeting,
            ),
            Binding::component("shop", &self.shop),
        ]
    }
}

impl Listener for Greeter {}

/// Instanced command backing that answers through the invoking sender.
#[derive(Default)]
pub(crate) struct Give {
    pub(crate) invoker: Wired<dyn Invoker>,
    pub(crate) player: Wired<dyn Player>,
}

impl Give {
    pub(crate) fn reply(&self, text: &str) {
        if let Some(invoker) = self.invoker.get() {
            invoker.send_message(text);
        }
    }
}

impl Injectable for Give {
    fn bindings(&self) -> Vec<Binding<'_>> {
        vec![
            Binding::component("invoker", &self.invoker),
            Binding::component("player", &self.player),
        ]
    }
}

impl Component for Give {}

impl ExternalPlugin for Vault {
    fn name(&self) -> &str {
        "Vault"
    }
}

pub(crate) fn database() -> ComponentDescriptor {
    ComponentDescriptor::singleton::<Database>("database", "Stores player data")
        .default_constructor()
        .build()
}

pub(crate) fn bank() -> ComponentDescriptor {
    ComponentDescriptor::singleton::<Bank>("bank", "Holds balances")
        .depends_on::<Database>()
        .provides::<dyn Economy>(|bank| bank)
        .default_constructor()
        .build()
}

pub(crate) fn shop() -> ComponentDescriptor {
    ComponentDescriptor::singleton::<Shop>("shop", "Sells things")
        .depends_on::<Bank>()
        .default_constructor()
        .build()
}

pub(crate) fn receipt() -> ComponentDescriptor {
    ComponentDescriptor::instanced::<Receipt>("receipt", "Per-purchase record")
        .default_constructor()
        .build()
}

pub(crate) fn broken() -> ComponentDescriptor {
    ComponentDescriptor::singleton::<Broken>("broken", "Never builds")
        .constructor(|| Err(ConstructionError::failed::<Broken>("disk on fire")))
        .build()
}

pub(crate) fn needs_broken() -> ComponentDescriptor {
    ComponentDescriptor::singleton::<NeedsBroken>("needs-broken", "Depends on broken")
        .depends_on::<Broken>()
        .default_constructor()
        .build()
}

pub(crate) fn give() -> ComponentDescriptor {
    ComponentDescriptor::instanced::<Give>("give", "Hands out items")
        .default_constructor()
        .build()
}

/// `/give` with `diamond`/`dia`, `whoami`, and `nothing` subcommands and a
/// default handler.
pub(crate) fn give_command() -> CommandBuilder<Give> {
    CommandBuilder::<Give>::new("give", "cardboard.give")
        .alias("gv")
        .usage("&c/give <item> [amount]")
        .permission_message("&cNo.")
        .subcommand(Subcommand::new(
            ["diamond", "dia"],
            "cardboard.give.diamond",
            |give: &Give, joined: &str, rest: &[String]| {
                give.reply(&format!("diamond [{joined}] {}", rest.len()));
                true
            },
        ))
        .subcommand(Subcommand::new(
            ["whoami"],
            "cardboard.give",
            |give: &Give, _: &str, _: &[String]| {
                let who = give
                    .player
                    .get()
                    .map_or_else(|| "console".to_owned(), |player| player.unique_id());
                give.reply(&who);
                true
            },
        ))
        .subcommand(Subcommand::new(
            ["nothing"],
            "cardboard.give",
            |_: &Give, _: &str, _: &[String]| false,
        ))
        .default_handler(|give: &Give, label: &str, args: &[String]| {
            give.reply(&format!("default {label} [{}]", args.join(" ")));
            true
        })
}

/// Owned argument vector.
pub(crate) fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

pub(crate) fn shop_config() -> ConfigSection {
    ConfigSection::new()
        .with("database.url", "jdbc:h2:mem")
        .with("shop.greeting", "&aWelcome!")
        .with("shop.slots", 27)
}

pub(crate) fn config_store() -> Arc<ConfigStore> {
    let bank = ConfigSection::new().with("currency", "emeralds");
    Arc::new(ConfigStore::new(Arc::new(shop_config())).with_source("bank.yml", Arc::new(bank)))
}

pub(crate) fn empty_registry() -> ComponentRegistry {
    ComponentRegistry::new(config_store(), Arc::new(PluginTable::new()))
}

/// Builds a registry from `descriptors` and instantiates its singletons.
pub(crate) fn loaded_registry(descriptors: Vec<ComponentDescriptor>) -> ComponentRegistry {
    let mut registry = empty_registry();
    let rejected = registry.classify(descriptors).expect("classify components");
    assert!(rejected.is_empty(), "unexpected rejections: {rejected:?}");
    let failures = registry
        .instantiate_singletons()
        .expect("instantiate singletons");
    assert!(failures.is_empty(), "unexpected failures: {failures:?}");
    registry
}

/// Invoker that records every message it receives.
pub(crate) struct RecordingInvoker {
    name: String,
    permissions: Vec<String>,
    operator: bool,
    player: Option<Arc<dyn Player>>,
    messages: Mutex<Vec<String>>,
}

impl RecordingInvoker {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            permissions: Vec::new(),
            operator: false,
            player: None,
            messages: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_permission(mut self, node: &str) -> Self {
        self.permissions.push(node.to_owned());
        self
    }

    pub(crate) const fn operator(mut self) -> Self {
        self.operator = true;
        self
    }

    pub(crate) fn as_player(mut self) -> Self {
        self.player = Some(Arc::new(TestPlayer {
            name: self.name.clone(),
        }));
        self
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("messages lock").clone()
    }
}

impl Invoker for RecordingInvoker {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn has_permission(&self, node: &str) -> bool {
        self.permissions.iter().any(|held| held == node)
    }

    fn is_operator(&self) -> bool {
        self.operator
    }

    fn send_message(&self, message: &str) {
        self.messages
            .lock()
            .expect("messages lock")
            .push(message.to_owned());
    }

    fn player(&self) -> Option<Arc<dyn Player>> {
        self.player.clone()
    }
}

pub(crate) struct TestPlayer {
    name: String,
}

impl Player for TestPlayer {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn unique_id(&self) -> String {
        format!("uuid-{}", self.name)
    }
}

/// Host that keeps whatever it is asked to register.
#[derive(Default)]
pub(crate) struct RecordingHost {
    listeners: Mutex<Vec<String>>,
    commands: Mutex<Vec<Arc<dyn Dispatch>>>,
}

impl RecordingHost {
    pub(crate) fn listener_names(&self) -> Vec<String> {
        self.listeners.lock().expect("listeners lock").clone()
    }

    pub(crate) fn command_names(&self) -> Vec<String> {
        self.commands
            .lock()
            .expect("commands lock")
            .iter()
            .map(|command| command.descriptor().name().to_owned())
            .collect()
    }
}

impl Host for RecordingHost {
    fn register_listener(&self, name: &str, _listener: Arc<dyn Listener>) {
        self.listeners
            .lock()
            .expect("listeners lock")
            .push(name.to_owned());
    }

    fn register_command(&self, command: Arc<dyn Dispatch>) {
        self.commands.lock().expect("commands lock").push(command);
    }
}
