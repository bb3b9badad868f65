use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

/// Recompute the true maximum terminal priority of `r`'s subtree.
fn subtree_max(trie: &PriorityTrie, r: NodeRef) -> i64 {
    let node = trie.node(r).unwrap();
    let mut max = if node.is_terminal() {
        node.priority()
    } else {
        UNSET_PRIORITY
    };
    for (_, child) in node.present_children() {
        max = max.max(subtree_max(trie, child));
    }
    max
}

fn is_descendant(trie: &PriorityTrie, node: NodeRef, ancestor: NodeRef) -> bool {
    let mut current = node;
    while !current.is_null() {
        if current == ancestor {
            return true;
        }
        current = trie.node(current).unwrap().parent();
    }
    false
}

/// Walk the whole tree and check every structural invariant: parent
/// links, terminal payload shape, and the subtree-max cache.
fn validate_trie(trie: &PriorityTrie) {
    let mut stack = vec![trie.root()];
    let mut visited = 0usize;

    while let Some(r) = stack.pop() {
        visited += 1;
        let node = trie.node(r).expect("reachable node must exist");

        for (symbol, child) in node.present_children() {
            assert_eq!(
                trie.node(child).unwrap().parent(),
                r,
                "child {symbol:?} must back-reference its creator"
            );
            stack.push(child);
        }

        if let Some(word) = node.word() {
            assert!(word.ends_with(TERMINATOR), "payload must carry terminator");
            assert!(node.priority() >= 0, "terminal priority starts at 0");
            assert_eq!(node.best_terminal(), r);
            assert_eq!(node.best_priority(), node.priority());
        } else {
            assert_eq!(node.priority(), UNSET_PRIORITY);
        }

        let expected = subtree_max(trie, r);
        assert_eq!(
            node.best_priority(),
            expected,
            "cached best_priority must equal the true subtree maximum"
        );
        if expected == UNSET_PRIORITY {
            assert!(node.best_terminal().is_null());
        } else {
            let best = node.best_terminal();
            let best_node = trie.node(best).expect("cached terminal must exist");
            assert!(best_node.is_terminal());
            assert_eq!(best_node.priority(), expected);
            assert!(
                is_descendant(trie, best, r),
                "cached terminal must live in the subtree"
            );
        }
    }

    assert_eq!(visited, trie.node_count(), "every node must be reachable");
}

fn terminal_of(trie: &PriorityTrie, word: &str) -> NodeRef {
    let node = trie.node_at(word).unwrap();
    trie.descend(node, TERMINATOR).unwrap()
}

/// Build a trie plus a word -> priority model, replaying `updates` as
/// indices into the word list.
fn build(
    policy: Policy,
    words: &[String],
    updates: &[prop::sample::Index],
) -> (PriorityTrie, BTreeMap<String, i64>) {
    let mut trie = PriorityTrie::new(policy);
    let mut model: BTreeMap<String, i64> = BTreeMap::new();
    let mut clock = 0i64;

    for word in words {
        trie.insert(word).unwrap();
        model.entry(word.clone()).or_insert(0);
    }

    for idx in updates {
        let word = &words[idx.index(words.len())];
        trie.update_priority(terminal_of(&trie, word));
        match policy {
            Policy::Recency => {
                clock += 1;
                model.insert(word.clone(), clock);
            }
            Policy::Frequency => {
                *model.get_mut(word).unwrap() += 1;
            }
        }
    }

    (trie, model)
}

fn words_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,10}", 1..40)
}

fn updates_strategy() -> impl Strategy<Value = Vec<prop::sample::Index>> {
    prop::collection::vec(any::<prop::sample::Index>(), 0..120)
}

proptest! {
    #[test]
    fn prop_cache_invariant_recency(
        words in words_strategy(),
        updates in updates_strategy(),
    ) {
        let (trie, _) = build(Policy::Recency, &words, &updates);
        validate_trie(&trie);
    }

    #[test]
    fn prop_cache_invariant_frequency(
        words in words_strategy(),
        updates in updates_strategy(),
    ) {
        let (trie, _) = build(Policy::Frequency, &words, &updates);
        validate_trie(&trie);
    }

    #[test]
    fn prop_suggest_matches_model(
        words in words_strategy(),
        updates in updates_strategy(),
        policy in prop_oneof![Just(Policy::Recency), Just(Policy::Frequency)],
    ) {
        let (trie, model) = build(policy, &words, &updates);

        let mut prefixes: Vec<String> = vec![String::new(), "zzzzzzzzzzz".into()];
        for word in &words {
            for end in 1..=word.len() {
                prefixes.push(word[..end].to_string());
            }
        }

        for prefix in prefixes {
            let best = model
                .iter()
                .filter(|(w, _)| w.starts_with(&prefix))
                .map(|(_, &p)| p)
                .max();
            let suggestion = trie.suggest(&prefix).unwrap();
            match best {
                None => prop_assert_eq!(suggestion, None),
                Some(max) => {
                    let word = suggestion.expect("completion must exist");
                    prop_assert!(word.starts_with(&prefix));
                    // Any achiever of the maximum is a valid suggestion;
                    // ties are broken by age, which the model doesn't track.
                    prop_assert_eq!(model[word], max);
                }
            }
        }
    }

    #[test]
    fn prop_reinsertion_changes_nothing(
        words in words_strategy(),
        updates in updates_strategy(),
    ) {
        let (mut trie, model) = build(Policy::Frequency, &words, &updates);
        let nodes_before = trie.node_count();
        let root_best = trie.node(trie.root()).unwrap().best_terminal();

        for word in &words {
            prop_assert!(!trie.insert(word).unwrap());
        }

        prop_assert_eq!(trie.node_count(), nodes_before);
        prop_assert_eq!(trie.len(), model.len());
        prop_assert_eq!(trie.node(trie.root()).unwrap().best_terminal(), root_best);
        for (word, &priority) in &model {
            let terminal = terminal_of(&trie, word);
            prop_assert_eq!(trie.node(terminal).unwrap().priority(), priority);
        }
    }

    #[test]
    fn prop_words_roundtrip(words in words_strategy()) {
        let mut trie = PriorityTrie::default();
        for word in &words {
            trie.insert(word).unwrap();
        }

        let mut expected: Vec<&str> = words.iter().map(String::as_str).collect();
        expected.sort_unstable();
        expected.dedup();

        let got: Vec<&str> = trie.words().collect();
        prop_assert_eq!(got, expected);

        for word in &words {
            prop_assert!(trie.contains(word).unwrap());
        }
    }
}
