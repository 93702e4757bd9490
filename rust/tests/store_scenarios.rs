use minidb::{BTree, Node, SlotStore};

const WORDS: [&str; 11] = [
    "Batata",
    "batatinha",
    "bolacha",
    "gif",
    "copo",
    "batatao",
    "hermeserenato",
    "bingo",
    "trave",
    "ufabc",
    "mouse",
];

fn word_store(max_branching: usize) -> SlotStore<String, String, fn(&String) -> String> {
    SlotStore::from_records_with_branching(
        max_branching,
        WORDS.iter().map(|w| w.to_string()),
        String::clone as fn(&String) -> String,
    )
}

fn max_node_len<K>(node: &Node<K>) -> usize {
    node.children()
        .iter()
        .map(max_node_len)
        .fold(node.len(), usize::max)
}

#[test]
fn branching_three_scenario_with_string_keys() {
    let entries = [
        ("a", 45),
        ("b", 2),
        ("c", 64),
        ("d", 4),
        ("e", 54),
        ("f", 52),
        ("aa", 50),
        ("aaa", 14),
        ("g", 689),
        ("aaaa", 1),
        ("aaaaa", 12),
    ];
    let mut tree = BTree::new(3);
    for (key, value) in entries {
        assert!(tree.insert(key, value));
        tree.check_invariants().unwrap();
    }

    assert_eq!(tree.remove(&"c"), Some(64));
    tree.check_invariants().unwrap();

    assert_eq!(tree.search(&"c"), None);
    for (key, value) in entries.iter().filter(|(key, _)| *key != "c") {
        assert_eq!(tree.search(key), Some(*value), "lost {}", key);
    }
    assert!(max_node_len(tree.root().unwrap()) <= 2);
    assert_eq!(tree.len(), entries.len() - 1);
}

#[test]
fn word_store_lookups() {
    let store = word_store(3);
    store.check_invariants().unwrap();

    assert_eq!(store.find(&"Batata".to_string()).map(String::as_str), Some("Batata"));
    assert_eq!(
        store.find(&"hermeserenato".to_string()).map(String::as_str),
        Some("hermeserenato")
    );
    assert_eq!(store.find(&"fabaolaf".to_string()), None);
    assert_eq!(store.len(), WORDS.len());
    assert_eq!(store.index().search(&"trave".to_string()), Some(8));
}

#[test]
fn removed_word_leaves_hole_then_slot_is_reused() {
    let mut store = word_store(3);
    assert_eq!(store.remove(&"trave".to_string()), Some("trave".to_string()));
    assert_eq!(store.find(&"trave".to_string()), None);
    assert_eq!(store.get(8), None);
    assert_eq!(store.records().len(), WORDS.len());

    assert_eq!(store.insert("chinelo".to_string()), Some(8));
    assert_eq!(store.get(8).map(String::as_str), Some("chinelo"));
    store.check_invariants().unwrap();
}

#[test]
fn holes_are_filled_oldest_first() {
    let mut store = word_store(4);
    for word in ["gif", "Batata", "mouse"] {
        store.remove(&word.to_string());
    }
    assert_eq!(store.free_slots().iter().copied().collect::<Vec<_>>(), vec![3, 0, 10]);

    assert_eq!(store.insert("lapis".to_string()), Some(3));
    assert_eq!(store.insert("caneta".to_string()), Some(0));
    assert_eq!(store.insert("borracha".to_string()), Some(10));
    assert_eq!(store.insert("regua".to_string()), Some(11));
    assert!(store.free_slots().is_empty());
    store.check_invariants().unwrap();
}

#[test]
fn duplicate_insert_is_idempotent() {
    let mut store = word_store(3);
    let before = store.snapshot();
    assert_eq!(store.insert("copo".to_string()), None);
    assert_eq!(store.snapshot(), before);
}

#[test]
fn removing_missing_key_is_a_no_op() {
    let mut store = word_store(3);
    let before = store.snapshot();
    assert_eq!(store.remove(&"fabaolaf".to_string()), None);
    assert_eq!(store.snapshot(), before);
}

#[test]
fn draining_store_and_refilling() {
    let mut store = word_store(3);
    for word in WORDS {
        assert!(store.remove(&word.to_string()).is_some());
        store.check_invariants().unwrap();
    }
    assert!(store.is_empty());
    assert!(store.index().is_empty());
    assert_eq!(store.free_slots().len(), WORDS.len());

    for (expected, word) in WORDS.iter().enumerate() {
        assert_eq!(store.insert(word.to_string()), Some(expected));
    }
    store.check_invariants().unwrap();
}

#[test]
fn records_iterate_in_key_order() {
    let store = word_store(5);
    let mut sorted: Vec<_> = WORDS.to_vec();
    sorted.sort();
    let by_key: Vec<_> = store.iter_by_key().map(String::as_str).collect();
    assert_eq!(by_key, sorted);
}
