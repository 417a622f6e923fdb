//! Integration tests for command tree construction and matching.

use rstest::rstest;

use polycli::cli;
use polycli::registry::{CommandNode, CommandTree, RegistryError};
use polycli::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn leaf(name: &'static str) -> CommandNode {
    CommandNode::new(name, "a leaf").body(|_| Ok(()))
}

fn sample_tree() -> CommandTree {
    let abi = CommandNode::new("abi", "encoding and decoding")
        .with_child(leaf("encode"))
        .and_then(|n| n.with_child(leaf("decode")))
        .unwrap();
    let root = CommandNode::new("tool", "root")
        .with_child(abi)
        .and_then(|n| n.with_child(leaf("hash")))
        .unwrap();
    CommandTree::new(root)
}

#[test]
fn given_duplicate_sibling_when_attaching_then_rejected() {
    let mut root = CommandNode::new("tool", "root");
    root.attach(leaf("hash")).unwrap();

    let err = root.attach(leaf("hash")).unwrap_err();

    assert_eq!(
        err,
        RegistryError::DuplicateName {
            parent: "tool".into(),
            name: "hash".into()
        }
    );
    assert_eq!(root.children().len(), 1, "original child must not be replaced");
}

#[test]
fn given_duplicate_in_builder_chain_when_building_then_error_is_deterministic() {
    let build = || {
        CommandNode::new("tool", "root")
            .with_child(leaf("a"))?
            .with_child(leaf("b"))?
            .with_child(leaf("a"))
    };
    for _ in 0..3 {
        assert!(matches!(
            build(),
            Err(RegistryError::DuplicateName { ref name, .. }) if name == "a"
        ));
    }
}

#[rstest]
#[case(&["abi", "encode", "0xdead"], "encode", 2)]
#[case(&["abi", "decode"], "decode", 2)]
#[case(&["hash", "abi"], "hash", 1)]
#[case(&["hash", "sha256", "x"], "hash", 1)]
fn given_tokens_when_matching_then_deepest_node_and_remainder(
    #[case] argv: &[&str],
    #[case] expected: &str,
    #[case] consumed: usize,
) {
    let tree = sample_tree();

    let matched = tree.match_args(argv).expect("runnable match");

    assert_eq!(matched.node().name(), expected);
    assert_eq!(matched.consumed, consumed);
    assert_eq!(matched.remainder(argv), &argv[consumed..]);
}

#[test]
fn given_group_without_subcommand_when_matching_then_usage_error() {
    let tree = sample_tree();

    let err = tree.match_args(&["abi"][..]).unwrap_err();

    assert_eq!(
        err,
        RegistryError::NotRunnable {
            path: "tool abi".into(),
            token: None
        }
    );
}

#[test]
fn given_group_with_unknown_token_when_matching_then_usage_error_names_token() {
    let tree = sample_tree();

    let err = tree.match_args(&["abi", "frobnicate"][..]).unwrap_err();

    assert!(matches!(
        err,
        RegistryError::NotRunnable { token: Some(ref t), .. } if t == "frobnicate"
    ));
}

#[test]
fn given_empty_argv_when_matching_then_root_is_not_runnable() {
    let tree = sample_tree();
    let empty: [&str; 0] = [];

    assert!(tree.match_args(&empty[..]).is_err());
}

#[test]
fn given_polycli_tree_when_built_then_has_expected_commands() {
    let tree = cli::command_tree().expect("tree builds");
    let root = tree.root();

    let names: Vec<_> = root.children().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["config", "hash", "version", "completion"]);
    assert!(!root.is_runnable());

    let config = root.child("config").unwrap();
    assert!(!config.is_runnable());
    assert!(config.child("show").unwrap().is_runnable());
    assert!(config.child("path").unwrap().is_runnable());
    assert!(config.child("init").unwrap().is_runnable());
}

#[test]
fn given_polycli_tree_when_rendered_then_clap_accepts_it() {
    let tree = cli::command_tree().unwrap();
    let cmd = tree.to_clap();

    cmd.clone().debug_assert();
    let root_flags: Vec<_> = cmd.get_arguments().map(|a| a.get_id().as_str()).collect();
    assert!(root_flags.contains(&"config"));
    assert!(root_flags.contains(&"verbosity"));
    assert!(root_flags.contains(&"pretty_logs"));
    assert!(root_flags.contains(&"toggle"));
}
