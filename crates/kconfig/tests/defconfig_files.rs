use std::fs;

use kconfig::{DEFCONFIG_HEADER, DISABLED, Defconfig, LoadError};
use tempfile::tempdir;

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("defconfig");

    let config: Defconfig = [
        ("ARCH", "\"arm\""),
        ("BOARD_LOOPSPERMSEC", "5483"),
        ("CXD56_SPI4", "y"),
        ("NSH_PROMPT_STRING", "\"nsh> \""),
        ("USER_ENTRYPOINT", "\"nsh_main\""),
    ]
    .into_iter()
    .collect();
    config.save(Some(&path)).unwrap();

    let mut loaded = Defconfig::new();
    loaded.load(Some(&path)).unwrap();
    assert_eq!(loaded.options(), config.options());
}

#[test]
fn disabled_marker_survives_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("defconfig");

    let mut config = Defconfig::with_path(&path);
    config.set("DEBUG_FEATURES", DISABLED);
    config.set("SMP", "y");
    config.save(None).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n# CONFIG_DEBUG_FEATURES is not set\n"));
    assert!(!text.contains("CONFIG_DEBUG_FEATURES=n"));

    let mut loaded = Defconfig::with_path(&path);
    loaded.load(None).unwrap();
    assert_eq!(loaded.get("DEBUG_FEATURES"), Some(DISABLED));
    assert_eq!(loaded.get("SMP"), Some("y"));
}

#[test]
fn saving_twice_is_byte_identical() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");

    let config: Defconfig = [("Z", "1"), ("A", "n"), ("M", "\"x=y\"")].into_iter().collect();
    config.save(Some(&first)).unwrap();
    config.save(Some(&second)).unwrap();
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn save_sorts_regardless_of_input_order() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("unsorted");
    let output = dir.path().join("sorted");
    fs::write(
        &input,
        "CONFIG_ZZZ=y\nCONFIG_AAA=y\n# CONFIG_MMM is not set\nCONFIG_BBB=2\n",
    )
    .unwrap();

    let mut config = Defconfig::new();
    config.load(Some(&input)).unwrap();
    config.save(Some(&output)).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        format!(
            "{DEFCONFIG_HEADER}\n# CONFIG_MMM is not set\nCONFIG_AAA=y\nCONFIG_BBB=2\nCONFIG_ZZZ=y\n"
        )
    );
}

#[test]
fn saved_file_reproduces_prefixed_line() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::write(&input, "CONFIG_DEBUG=y\n").unwrap();

    let mut config = Defconfig::new();
    config.load(Some(&input)).unwrap();
    assert_eq!(config.get("DEBUG"), Some("y"));

    config.save(Some(&output)).unwrap();
    let text = fs::read_to_string(&output).unwrap();
    assert!(text.ends_with("\nCONFIG_DEBUG=y\n"));
}

#[test]
fn missing_file_is_not_found_and_keeps_options() {
    let dir = tempdir().unwrap();
    let mut config: Defconfig = [("KEEP", "y")].into_iter().collect();

    let err = config.load(Some(&dir.path().join("missing"))).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
    assert!(err.is_not_found());
    assert_eq!(config.get("KEEP"), Some("y"));
    assert_eq!(config.len(), 1);
}

#[test]
fn repeated_loads_merge() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    fs::write(&first, "CONFIG_A=1\nCONFIG_B=1\n").unwrap();
    fs::write(&second, "CONFIG_B=2\nCONFIG_C=2\n").unwrap();

    let mut config = Defconfig::new();
    config.load(Some(&first)).unwrap();
    config.load(Some(&second)).unwrap();
    assert_eq!(config.to_string(), "(A = 1),(B = 2),(C = 2)");
}

#[test]
fn save_diff_writes_listing_without_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("defconfig");

    let current: Defconfig = [("A", "1"), ("B", "2")].into_iter().collect();
    let base: Defconfig = [("B", "3"), ("C", "4")].into_iter().collect();
    current.save_diff(&base, Some(&path)).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "-C=4\n B=3->2\n+A=1\n");
    assert_eq!(base.get("C"), Some("4"));
}

#[test]
fn save_diff_of_identical_configs_is_empty_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("defconfig");
    fs::write(&path, "stale contents\n").unwrap();

    let current = Defconfig::with_path(&path);
    current.save_diff(&Defconfig::new(), None).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn loading_saved_diff_is_harmless() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("diff");
    fs::write(&path, "-C=4\n B=3->2\n+A=1\n\nCONFIG_FOO # comment without equals\n").unwrap();

    let mut config = Defconfig::new();
    config.load(Some(&path)).unwrap();
    assert_eq!(config.get("-C"), Some("4"));
    assert_eq!(config.get("+A"), Some("1"));
    assert_eq!(config.get(" B"), Some("3->2"));
    assert_eq!(config.len(), 3);
}
