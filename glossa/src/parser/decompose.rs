use crate::chain::ChainDict;

/// Finds every split of `form` into exactly `parts` keys of `dict`.
///
/// Longer prefixes are explored first, but shorter ones are explored as well.
/// Splits are returned in that order.
pub fn split_composite<'a>(form: &'a str, dict: &ChainDict, parts: usize) -> Vec<Vec<&'a str>> {
    let mut results = vec![];
    if parts == 0 {
        return results;
    }
    let mut stack = vec![(0, vec![])];
    while let Some((offset, pieces)) = stack.pop() {
        if pieces.len() == parts {
            if offset == form.len() {
                results.push(pieces);
            }
            continue;
        }
        // Prefixes come shortest first, so the longest is popped first.
        for prefix in dict.iter_prefixes(&form[offset..]) {
            let mut next: Vec<&'a str> = Vec::with_capacity(pieces.len() + 1);
            next.extend_from_slice(&pieces);
            next.push(prefix);
            stack.push((offset + prefix.len(), next));
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionaryBuilder;
    use crate::gloss::Gloss;

    fn chain(keys: &[&str]) -> ChainDict {
        let mut builder = DictionaryBuilder::new();
        builder.set_lang("xx");
        builder.set_name("test");
        builder.set_ver("1");
        for &k in keys {
            builder.insert(k, Gloss::new(k, ["n"], k.to_uppercase(), []));
        }
        ChainDict::from_dicts([builder.build().unwrap()])
    }

    #[test]
    fn test_two_parts() {
        let dict = chain(&["a", "b", "ab", "ba"]);
        assert_eq!(split_composite("ab", &dict, 2), vec![vec!["a", "b"]]);
        assert_eq!(split_composite("ab", &dict, 1), vec![vec!["ab"]]);
        assert!(split_composite("ab", &dict, 3).is_empty());
        assert!(split_composite("ab", &dict, 0).is_empty());
    }

    #[test]
    fn test_longest_first() {
        let dict = chain(&["a", "b", "ab", "ba", "aba"]);
        assert_eq!(
            split_composite("abab", &dict, 2),
            vec![vec!["aba", "b"], vec!["ab", "ab"]]
        );
        assert_eq!(
            split_composite("abab", &dict, 3),
            vec![vec!["ab", "a", "b"], vec!["a", "ba", "b"], vec!["a", "b", "ab"]]
        );
    }

    #[test]
    fn test_no_full_split() {
        let dict = chain(&["ka", "kan"]);
        assert!(split_composite("kanx", &dict, 2).is_empty());
        assert!(split_composite("", &dict, 2).is_empty());
    }

    #[test]
    fn test_multibyte() {
        let dict = chain(&["dɔ", "gɔ", "dɔgɔ"]);
        assert_eq!(split_composite("dɔgɔ", &dict, 2), vec![vec!["dɔ", "gɔ"]]);
    }
}
