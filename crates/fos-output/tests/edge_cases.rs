//! Edge case tests for fos-output
//!
//! Malformed templates, out-of-range text offsets and lookups that fall
//! back instead of failing.

use fos_a11y::{A11yError, AccessibilityNode, AccessibilityTree, Cursor, NodeId, Range, Role};
use fos_output::{EventType, MessageTable, Output, OutputConfig, OutputError, RuleTable};

fn tree_with(node: AccessibilityNode) -> (AccessibilityTree, NodeId) {
    let mut tree = AccessibilityTree::new();
    let root = tree.create_root(Role::Window);
    let id = tree.insert(root, node).unwrap();
    (tree, id)
}

fn rules_with(json: &str) -> RuleTable {
    let mut rules = RuleTable::default();
    rules.merge_json(json).unwrap();
    rules
}

fn render(tree: &AccessibilityTree, rules: &RuleTable, range: &Range) -> Result<Vec<String>, OutputError> {
    let messages = MessageTable::english();
    let mut output = Output::new(tree, rules, &messages);
    output.with_speech(range, None, &EventType::Navigate)?;
    let texts = output.speech_buffer().texts().into_iter().map(String::from).collect();
    Ok(texts)
}

#[test]
fn test_unbalanced_template_fails_render() {
    let (tree, button) = tree_with(AccessibilityNode::new(Role::Button).with_attr("name", "OK"));
    let rules = rules_with(r#"{"navigate": {"default": {"speak": "$name @describe_index($indexInParent"}}}"#);
    let messages = MessageTable::english();

    let mut output = Output::new(&tree, &rules, &messages);
    let result = output.with_speech(&Range::from_node(button), None, &EventType::Navigate);
    assert!(matches!(result, Err(OutputError::UnbalancedParens(_))));

    // The name rendered before the fault is discarded
    assert!(output.speech_buffer().is_empty());
    assert!(output.locations().is_empty());
}

#[test]
fn test_sub_node_range_clamps_reversed_offsets() {
    let (tree, text) = tree_with(AccessibilityNode::new(Role::StaticText).with_attr("name", "Hello world"));
    let rules = RuleTable::default();

    let reversed = Range::new(Cursor::new(text, 5), Cursor::new(text, 3));
    assert_eq!(render(&tree, &rules, &reversed).unwrap(), vec!["lo"]);

    let collapsed = Range::new(Cursor::new(text, 4), Cursor::new(text, 4));
    assert_eq!(render(&tree, &rules, &collapsed).unwrap(), vec!["o"]);

    let past_end = Range::new(Cursor::new(text, 8), Cursor::new(text, 40));
    assert_eq!(render(&tree, &rules, &past_end).unwrap(), vec!["rld"]);
}

#[test]
fn test_sub_node_range_skips_name_and_value() {
    let (tree, field) = tree_with(
        AccessibilityNode::new(Role::TextField)
            .with_attr("name", "Search")
            .with_attr("value", "query"),
    );
    let rules = RuleTable::default();

    let caret = Range::new(Cursor::new(field, 1), Cursor::new(field, 1));
    assert_eq!(render(&tree, &rules, &caret).unwrap(), vec!["u"]);
}

#[test]
fn test_malformed_find_query() {
    let (tree, button) = tree_with(AccessibilityNode::new(Role::Button).with_attr("name", "OK"));
    let rules = rules_with(r#"{"navigate": {"button": {"speak": "$find({\"state\": oops}, $name)"}}}"#);

    let result = render(&tree, &rules, &Range::from_node(button));
    assert!(matches!(result, Err(OutputError::Tree(A11yError::InvalidQuery(_)))));
}

#[test]
fn test_find_without_match() {
    let (tree, button) = tree_with(AccessibilityNode::new(Role::Button).with_attr("name", "OK"));
    let rules = rules_with(r#"{"navigate": {"button": {"speak": "$name $find({\"role\": \"link\"}, $name)"}}}"#);

    assert_eq!(render(&tree, &rules, &Range::from_node(button)).unwrap(), vec!["OK"]);
}

#[test]
fn test_nesting_depth_limit() {
    let (tree, item) = tree_with(
        AccessibilityNode::new(Role::MenuItem)
            .with_attr("name", "Open")
            .with_attr("haspopup", true),
    );
    let rules = RuleTable::default();
    let messages = MessageTable::english();

    let mut output = Output::new(&tree, &rules, &messages);
    output
        .with_speech(&Range::from_node(item), None, &EventType::Navigate)
        .unwrap();
    assert_eq!(output.speech_text(), "Open, menu item with submenu 1 of 1");

    let config = OutputConfig { max_depth: 2, ..Default::default() };
    let mut output = Output::new(&tree, &rules, &messages).with_config(config);
    let result = output.with_speech(&Range::from_node(item), None, &EventType::Navigate);
    assert!(matches!(result, Err(OutputError::DepthExceeded(2))));
}

#[test]
fn test_earcon_edge_cases() {
    let (tree, _) = tree_with(AccessibilityNode::new(Role::Button));
    let rules = RuleTable::default();
    let messages = MessageTable::english();

    let mut output = Output::new(&tree, &rules, &messages);
    // Nothing to attach to yet, then an id that does not exist
    output.format("$earcon(OBJECT_OPEN) @tag_button $earcon(NOT_AN_EARCON)").unwrap();

    let units = output.speech_buffer().units();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].earcons().count(), 0);
}

#[test]
fn test_tolerated_tokens() {
    let (tree, button) = tree_with(AccessibilityNode::new(Role::Button).with_attr("name", "OK"));
    let rules = rules_with(
        r#"{"navigate": {"button": {"speak": "bare $missing $name @no_such_message @describe_index(literal)"}}}"#,
    );

    assert_eq!(render(&tree, &rules, &Range::from_node(button)).unwrap(), vec!["OK"]);
}

#[test]
fn test_missing_role_info_uses_role_id() {
    let (tree, group) = tree_with(AccessibilityNode::new(Role::Group).with_attr("name", "Options"));
    let rules = RuleTable::default();

    assert_eq!(render(&tree, &rules, &Range::from_node(group)).unwrap(), vec!["Options", "", "group"]);
}

#[test]
fn test_missing_role_message_falls_back() {
    let (tree, button) = tree_with(AccessibilityNode::new(Role::Button).with_attr("name", "OK"));
    let rules = RuleTable::default();
    let messages = MessageTable::new();

    let mut output = Output::new(&tree, &rules, &messages);
    output
        .with_speech(&Range::from_node(button), None, &EventType::Navigate)
        .unwrap();
    assert_eq!(output.speech_text(), "OK button");
}

#[test]
fn test_braille_falls_back_to_speech_message() {
    let (tree, dialog) = tree_with(AccessibilityNode::new(Role::Dialog).with_attr("name", "Confirm"));
    let rules = RuleTable::default();
    let messages = MessageTable::english();

    let mut output = Output::new(&tree, &rules, &messages);
    output
        .with_braille(&Range::from_node(dialog), None, &EventType::Navigate)
        .unwrap();
    // No `dialog_brl` message exists
    assert_eq!(output.braille_buffer().joined(" "), "Confirm Dialog");
}

#[test]
fn test_unknown_event_uses_navigate_rules() {
    let (tree, button) = tree_with(AccessibilityNode::new(Role::Button).with_attr("name", "OK"));
    let rules = RuleTable::default();
    let messages = MessageTable::english();

    let mut output = Output::new(&tree, &rules, &messages);
    output
        .with_speech(&Range::from_node(button), None, &EventType::parse("focus"))
        .unwrap();
    assert_eq!(output.speech_text(), "OK Button");
}

#[test]
fn test_invalid_rule_json() {
    let mut rules = RuleTable::default();
    assert!(matches!(rules.merge_json("{\"navigate\": 3}"), Err(OutputError::InvalidRules(_))));
    assert!(rules.merge_json(r#"{"navigate": {"link": {"say": "$name"}}}"#).is_err());
    assert_eq!(rules, RuleTable::default());
}

#[test]
fn test_tabs_and_newlines_separate_tokens() {
    let (tree, button) = tree_with(AccessibilityNode::new(Role::Button).with_attr("name", "OK"));
    let rules = rules_with(r#"{"navigate": {"button": {"speak": "$name\t$role\n  @describe_index($indexInParent,\t$parentChildCount)"}}}"#);

    assert_eq!(render(&tree, &rules, &Range::from_node(button)).unwrap(), vec!["OK", "Button", "1 of 1"]);
}
