//! Unit tests for configuration sections, sources, and the store.

use std::fs;
use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use crate::{ConfigError, ConfigSection, ConfigSource, ConfigStore, ConfigValue};

const SHOP_YAML: &str = "\
shop:
  greeting: '&aWelcome!'
  open: true
  slots: 27
  tax: 0.2
  items:
    - apple
    - pear
  missing: ~
";

#[fixture]
fn shop() -> ConfigSection {
    ConfigSection::from_yaml_str(SHOP_YAML, "shop.yml").expect("parse shop config")
}

fn write(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).expect("write config file");
}

mod section_tests {
    use super::*;

    #[rstest]
    fn nested_paths_resolve(shop: ConfigSection) {
        assert_eq!(
            shop.get("shop.greeting"),
            Some(&ConfigValue::from("&aWelcome!"))
        );
        assert_eq!(shop.get("shop.slots"), Some(&ConfigValue::Integer(27)));
        assert!(shop.section("shop").is_some());
        assert_eq!(shop.get("shop.greeting.deeper"), None);
    }

    #[rstest]
    fn null_values_are_absent(shop: ConfigSection) {
        assert!(!shop.contains("shop.missing"));
    }

    #[rstest]
    fn lists_render_as_display_text(shop: ConfigSection) {
        let items = shop.get("shop.items").expect("items present");
        assert_eq!(items.to_string(), "[apple, pear]");
        assert_eq!(items.to_text(), None);
    }

    #[rstest]
    fn len_counts_direct_children(shop: ConfigSection) {
        assert!(!shop.is_empty());
        assert_eq!(shop.len(), 1);
        let nested = shop.section("shop").expect("shop section");
        assert_eq!(nested.len(), 5);
    }

    #[test]
    fn empty_document_is_empty_section() {
        let section = ConfigSection::from_yaml_str("", "empty.yml").expect("parse");
        assert!(section.is_empty());
    }

    #[test]
    fn scalar_root_is_rejected() {
        let err = ConfigSection::from_yaml_str("42", "numbers.yml").expect_err("scalar root");
        assert!(matches!(
            err,
            ConfigError::NotAMapping {
                found: "integer",
                ..
            }
        ));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = ConfigSection::from_yaml_str("shop: [unclosed", "broken.yml")
            .expect_err("malformed yaml");
        assert!(matches!(err, ConfigError::Parse { ref origin, .. } if origin == "broken.yml"));
    }

    #[test]
    fn set_creates_intermediate_sections() {
        let section = ConfigSection::new()
            .with("a", 1)
            .with("a.b.c", "deep");
        assert_eq!(section.get_string("a.b.c").as_deref(), Some("deep"));
        assert_eq!(section.len(), 1);
        assert_eq!(section.keys().collect::<Vec<_>>(), vec!["a"]);
    }
}

mod source_tests {
    use super::*;

    #[rstest]
    #[case::integer("shop.slots", 27)]
    #[case::float_truncates("shop.tax", 0)]
    #[case::text_is_zero("shop.greeting", 0)]
    #[case::missing_is_zero("shop.nothing", 0)]
    fn get_int_coerces(shop: ConfigSection, #[case] path: &str, #[case] expected: i32) {
        assert_eq!(shop.get_int(path), expected);
    }

    #[test]
    fn get_int_wraps_wide_integers() {
        let section = ConfigSection::new().with("big", 4_294_967_297_i64);
        assert_eq!(section.get_int("big"), 1);
        assert_eq!(section.get_long("big"), 4_294_967_297);
    }

    #[rstest]
    fn get_double_widens_integers(shop: ConfigSection) {
        assert_eq!(shop.get_double("shop.slots").to_bits(), 27.0_f64.to_bits());
        assert_eq!(shop.get_double("shop.tax").to_bits(), 0.2_f64.to_bits());
    }

    #[rstest]
    fn get_bool_is_strict(shop: ConfigSection) {
        assert!(shop.get_bool("shop.open"));
        assert!(!shop.get_bool("shop.slots"));
        assert!(!shop.get_bool("shop.nothing"));
    }

    #[rstest]
    fn get_string_renders_scalars(shop: ConfigSection) {
        assert_eq!(shop.get_string("shop.slots").as_deref(), Some("27"));
        assert_eq!(shop.get_string("shop.open").as_deref(), Some("true"));
        assert_eq!(shop.get_string("shop"), None);
    }
}

mod store_tests {
    use super::*;

    #[test]
    fn default_source_is_read_from_config_yml() {
        let dir = TempDir::new().expect("temp dir");
        write(&dir, "config.yml", "motd: hello\n");

        let store = ConfigStore::open(dir.path());
        assert_eq!(
            store.source(None).get_string("motd").as_deref(),
            Some("hello")
        );
    }

    #[rstest]
    #[case::exact("config.yml")]
    #[case::upper("CONFIG.YML")]
    fn default_file_name_maps_to_default_source(#[case] name: &str) {
        let default: Arc<dyn ConfigSource> = Arc::new(ConfigSection::new().with("motd", "hi"));
        let store = ConfigStore::new(Arc::clone(&default));

        assert!(Arc::ptr_eq(&store.source(Some(name)), &default));
        assert_eq!(store.cached_sources(), 0);
    }

    #[test]
    fn named_files_are_loaded_once() {
        let dir = TempDir::new().expect("temp dir");
        write(&dir, "prices.yml", "apple: 3\n");
        let store = ConfigStore::open(dir.path());

        assert_eq!(store.source(Some("prices.yml")).get_int("apple"), 3);
        write(&dir, "prices.yml", "apple: 5\n");
        assert_eq!(store.source(Some("prices.yml")).get_int("apple"), 3);
        assert_eq!(store.cached_sources(), 1);
    }

    #[rstest]
    #[case::missing(None)]
    #[case::malformed(Some("apple: [3\n"))]
    fn unusable_files_behave_as_empty(#[case] contents: Option<&str>) {
        let dir = TempDir::new().expect("temp dir");
        if let Some(text) = contents {
            write(&dir, "prices.yml", text);
        }
        let store = ConfigStore::open(dir.path());

        let source = store.source(Some("prices.yml"));
        assert!(!source.contains("apple"));
        assert_eq!(source.get_int("apple"), 0);
    }

    #[test]
    fn registered_sources_win_over_files() {
        let dir = TempDir::new().expect("temp dir");
        write(&dir, "prices.yml", "apple: 3\n");
        let store = ConfigStore::open(dir.path()).with_source(
            "prices.yml",
            Arc::new(ConfigSection::new().with("apple", 9)),
        );

        assert_eq!(store.source(Some("prices.yml")).get_int("apple"), 9);
    }

    #[test]
    fn store_without_data_dir_serves_empty_sections() {
        let store = ConfigStore::new(Arc::new(ConfigSection::new()));
        assert!(store.data_dir().is_none());
        assert!(!store.source(Some("other.yml")).contains("anything"));
    }
}
