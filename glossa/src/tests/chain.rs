use crate::chain::{ChainDict, Registration};
use crate::dictionary::{Dictionary, DictionaryBuilder};
use crate::gloss::Gloss;

const BAM_TXT: &str = include_str!("./resources/bam.txt");

fn dict(name: &str, ver: &str, entries: &[(&str, &str, &str)]) -> Dictionary {
    let mut builder = DictionaryBuilder::new();
    builder.set_lang("bam");
    builder.set_name(name);
    builder.set_ver(ver);
    for &(form, ps, gloss) in entries {
        builder.insert(form, Gloss::new(form, [ps], gloss, []));
    }
    builder.build().unwrap()
}

#[test]
fn test_lookup_aggregation() {
    let a = dict("a", "1", &[("kan", "n", "neck")]);
    let b = dict("b", "1", &[("kan", "n", "voice"), ("so", "n", "house")]);
    let (id_a, id_b) = (a.fingerprint(), b.fingerprint());
    let chain = ChainDict::from_dicts([a, b]);

    assert_eq!(chain.num_dicts(), 2);
    assert_eq!(chain.len(), 3);
    assert_eq!(
        chain.lookup("kan").unwrap(),
        vec![
            Gloss::new("kan", ["n"], "neck", []),
            Gloss::new("kan", ["n"], "voice", []),
        ]
    );
    assert!(chain.lookup("xyz").is_err());

    let without_a = chain.with_removed(&id_a);
    assert_eq!(
        without_a.lookup("kan").unwrap(),
        vec![Gloss::new("kan", ["n"], "voice", [])]
    );
    let without_b = chain.with_removed(&id_b);
    assert_eq!(
        without_b.lookup("kan").unwrap(),
        vec![Gloss::new("kan", ["n"], "neck", [])]
    );
    assert!(!without_b.contains("so"));

    // The snapshots leave the original untouched.
    assert_eq!(chain.lookup("kan").unwrap().len(), 2);
}

#[test]
fn test_iter_prefixes() {
    let a = dict("a", "1", &[("a", "n", "A"), ("ab", "n", "AB")]);
    let b = dict("b", "1", &[("ab", "n", "AB"), ("abc", "n", "ABC")]);
    let chain = ChainDict::from_dicts([a, b]);
    assert_eq!(
        chain.iter_prefixes("abcd").into_iter().collect::<Vec<_>>(),
        vec!["a", "ab", "abc"]
    );
    assert!(chain.iter_prefixes("b").is_empty());
}

#[test]
fn test_iter_unique_keys() {
    let a = dict("a", "1", &[("kan", "n", "neck"), ("so", "n", "house")]);
    let b = dict("b", "1", &[("kan", "v", "speak")]);
    let chain = ChainDict::from_dicts([a, b]);
    let items: Vec<_> = chain.iter().collect();
    assert_eq!(items.len(), 2);
    let (key, glosses) = &items[0];
    assert_eq!(*key, "kan");
    assert_eq!(glosses.len(), 2);
    assert_eq!(items[1].0, "so");
}

#[test]
fn test_replace_keeps_order() {
    let a = dict("a", "1", &[("kan", "n", "neck")]);
    let b = dict("b", "1", &[("kan", "n", "voice")]);
    let a2 = dict("a", "2", &[("kan", "n", "throat")]);
    let (id_a, id_b, id_a2) = (a.fingerprint(), b.fingerprint(), a2.fingerprint());

    let mut chain = ChainDict::from_dicts([a, b]);
    chain.replace(&id_a, a2);
    assert_eq!(chain.ids().collect::<Vec<_>>(), vec![id_a2, id_b]);
    assert_eq!(chain.lookup("kan").unwrap()[0].gloss, "throat");
    assert!(chain.get(&id_a).is_none());
    assert_eq!(chain.get(&id_a2).unwrap().ver(), "2");
}

#[test]
fn test_replace_with_earlier_member() {
    let a = dict("a", "1", &[("kan", "n", "neck")]);
    let b = dict("b", "1", &[("kan", "n", "voice")]);
    let c = dict("c", "1", &[("kan", "n", "throat")]);
    let a_again = dict("a", "1", &[("kan", "n", "neck")]);
    let (id_a, id_b, id_c) = (a.fingerprint(), b.fingerprint(), c.fingerprint());

    let mut chain = ChainDict::from_dicts([a, b, c]);
    chain.replace(&id_b, a_again);
    assert_eq!(chain.ids().collect::<Vec<_>>(), vec![id_a, id_c]);
    let glosses: Vec<_> = chain
        .lookup("kan")
        .unwrap()
        .into_iter()
        .map(|g| g.gloss)
        .collect();
    assert_eq!(glosses, vec!["neck", "throat"]);
}

#[test]
fn test_register() {
    let mut chain = ChainDict::new();
    let v1 = dict("a", "1", &[("kan", "n", "neck")]);
    let id1 = v1.fingerprint();
    assert_eq!(chain.register(v1), Registration::Added(id1));

    let same = dict("a", "1", &[("kan", "n", "neck")]);
    assert_eq!(chain.register(same), Registration::Unchanged(id1));
    assert_eq!(chain.num_dicts(), 1);

    let v2 = dict("a", "2", &[("kan", "n", "neck"), ("so", "n", "house")]);
    let id2 = v2.fingerprint();
    assert_eq!(
        chain.register(v2),
        Registration::Replaced { old: id1, new: id2 }
    );
    assert_eq!(chain.num_dicts(), 1);
    assert!(chain.contains("so"));

    let other = dict("b", "1", &[("ka", "pm", "INF")]);
    let id3 = other.fingerprint();
    assert_eq!(chain.register(other), Registration::Added(id3));
    assert_eq!(chain.ids().collect::<Vec<_>>(), vec![id2, id3]);
}

#[test]
fn test_toolbox_member() {
    let dict = Dictionary::from_toolbox_reader(BAM_TXT.as_bytes()).unwrap();
    let id = dict.fingerprint();
    let chain = ChainDict::new().with_added(dict);
    assert_eq!(chain.ids().collect::<Vec<_>>(), vec![id]);

    let kan = chain.lookup("kan").unwrap();
    assert_eq!(kan.len(), 2);
    assert_eq!(kan[0].gloss, "neck");
    assert_eq!(kan[1].gloss, "speak");
    assert!(!chain.contains("w"));
    assert!(chain.contains("bamakɔ"));

    let same = Dictionary::from_toolbox_reader(BAM_TXT.as_bytes()).unwrap();
    assert_eq!(same.fingerprint(), id);
}
