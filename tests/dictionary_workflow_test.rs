#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;

    use liwc_tools::dictionary::update::ChangeFile;
    use liwc_tools::dictionary::{CategoryId, Dictionary};
    use liwc_tools::error::LiwcError;

    const SAMPLE: &str = "%\n\
1\tPronoun\n\
2\tFunct\n\
12\tPosemo\n\
13\tNegemo\n\
14\tAffect\n\
%\n\
i\t1\t2\n\
we\t1\t2\n\
the\t2\n\
happ*\t12\t14\n\
ha*\t13\t14\n\
happy\t12\t14\n\
good\t12\t14\n\
sad\t13\t14\n\
mood\t14\n\
bad <of> mood\t13\n";

    fn id(value: u32) -> CategoryId {
        CategoryId::new(value)
    }

    fn ids(values: &[u32]) -> BTreeSet<CategoryId> {
        values.iter().copied().map(CategoryId::new).collect()
    }

    #[test]
    fn test_token_matching_scenarios() {
        let dictionary = Dictionary::parse(SAMPLE);

        assert_eq!(dictionary.categories_for_token("I"), ids(&[1, 2]));
        assert_eq!(dictionary.categories_for_token("we"), ids(&[1, 2]));
        // Exact entry beats the wildcards.
        assert_eq!(dictionary.categories_for_token("happy"), ids(&[12, 14]));
        // Longest wildcard prefix wins.
        assert_eq!(dictionary.categories_for_token("happily"), ids(&[12, 14]));
        assert_eq!(dictionary.categories_for_token("hat"), ids(&[13, 14]));
        assert!(dictionary.categories_for_token("h").is_empty());
        assert!(dictionary.categories_for_token("zebra").is_empty());
    }

    #[test]
    fn test_unhandled_lines_are_kept() {
        let dictionary = Dictionary::parse(SAMPLE);

        assert_eq!(dictionary.unhandled_lines(), &["bad <of> mood\t13".to_string()]);
        assert!(!dictionary.word_set().contains("bad <of> mood"));
    }

    #[test]
    fn test_maintenance_keeps_word_set_consistent() {
        let model = Dictionary::parse(SAMPLE);
        let mut dictionary = model.clone();

        dictionary
            .apply_edit_script("add\t12\tglad\ndel\t*\tmood\n")
            .unwrap();
        assert!(dictionary.is_consistent());

        dictionary.complete(&model).unwrap();
        assert!(dictionary.store().words(id(14)).unwrap().contains("glad"));
        assert!(dictionary.is_consistent());

        dictionary.empty_category(id(13), &model).unwrap();
        assert!(dictionary.is_consistent());
        assert!(!dictionary.store().words(id(14)).unwrap().contains("sad"));

        dictionary.drop_category(id(1), &model).unwrap();
        assert!(dictionary.is_consistent());
        assert!(!dictionary.store().contains_category(id(1)));
        assert_eq!(
            dictionary.store().words(id(2)).unwrap(),
            &BTreeSet::from(["the".to_string()])
        );
        assert!(!dictionary.word_set().contains("we"));
    }

    #[test]
    fn test_dedup_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let original = Dictionary::parse(SAMPLE);
        let mut dictionary = original.clone();

        let extraction = dictionary.prepare_dedup();
        assert!(extraction.words().contains("happ*"));
        assert!(extraction.words().contains("ha*"));
        assert!(!dictionary.word_set().contains("happy"));

        let review_path = dir.path().join("review.txt");
        fs::write(&review_path, extraction.render()).unwrap();
        let pruned_path = dir.path().join("pruned.dic");
        dictionary.save(&pruned_path).unwrap();

        let mut reloaded = Dictionary::load(&pruned_path).unwrap();
        let review = fs::read_to_string(&review_path).unwrap();
        reloaded.reintegrate(&review).unwrap();

        assert_eq!(reloaded.word_set(), original.word_set());
        assert_eq!(reloaded.store(), original.store());
    }

    #[test]
    fn test_curated_review_drops_entries() {
        let mut dictionary = Dictionary::parse(SAMPLE);
        let extraction = dictionary.prepare_dedup();

        // Keep only the wildcard entries.
        let curated: String = extraction
            .render()
            .lines()
            .filter(|line| line.split('\t').next().is_some_and(|w| w.ends_with('*')))
            .map(|line| format!("{line}\n"))
            .collect();
        let summary = dictionary.reintegrate(&curated).unwrap();

        assert_eq!(summary.words_added, 2);
        assert!(dictionary.word_set().contains("happ*"));
        assert!(!dictionary.word_set().contains("happy"));
        assert_eq!(dictionary.categories_for_token("happy"), [id(12), id(14)].into());
    }

    #[test]
    fn test_reintegrate_twice_conflicts() {
        let mut dictionary = Dictionary::parse(SAMPLE);
        let extraction = dictionary.prepare_dedup();
        dictionary.reintegrate(&extraction.render()).unwrap();

        let err = dictionary.reintegrate(&extraction.render()).unwrap_err();
        assert!(matches!(err, LiwcError::MergeConflict(_)));
    }

    #[test]
    fn test_update_then_save_and_compare() {
        let dir = tempfile::tempdir().unwrap();
        let original = Dictionary::parse(SAMPLE);
        let mut dictionary = original.clone();

        let change_file = ChangeFile::parse(
            "translation.csv",
            "orig;oldcats;newcats;trans;cat:12;mode:replace\n\
             happy;12;12;#add;cheerful;joyful\n\
             nice;12;12;#noequiv\n",
        )
        .unwrap();
        let report = dictionary
            .update_from_change_file(&change_file, &original)
            .unwrap();
        assert_eq!(report.additions, 2);
        assert_eq!(report.marker_count("#noequiv"), 1);

        let path = dir.path().join("updated.dic");
        dictionary.save(&path).unwrap();
        let updated = Dictionary::load(&path).unwrap();

        let comparison = original.compare(&updated);
        assert!(!comparison.is_identical());
        assert!(comparison.added_words.contains("cheerful"));
        assert!(comparison.removed_words.contains("good"));
        assert!(original.compare(&original.clone()).is_identical());
    }

    #[test]
    fn test_subset_and_expand() {
        let dictionary = Dictionary::parse(SAMPLE);
        let mut subset = dictionary.subset(&[id(12), id(14)]).unwrap();

        assert_eq!(subset.store().len(), 2);
        assert!(subset.is_consistent());

        let expanded = subset.expand_wildcards(["happiness", "hay", "hazard"]);
        assert_eq!(expanded, 2);
        assert!(subset.store().words(id(12)).unwrap().contains("happiness"));
        assert!(subset.store().words(id(14)).unwrap().contains("hazard"));
        assert!(!subset.word_set().iter().any(|w| w.ends_with('*')));
    }
}
