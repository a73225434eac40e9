use ctn_identifiers::catalog::{self, KINDS};
use ctn_identifiers::form::IdentifierForm;
use proptest::prelude::*;

proptest! {
    #[test]
    fn kvk_accepts_eight_digits_with_padding(digits in "[0-9]{8}", pad in " {0,3}") {
        let value = format!("{pad}{digits}{pad}");
        prop_assert!(catalog::value_matches("KVK", &value));
    }

    #[test]
    fn digit_patterns_reject_non_ascii_digits(digits in "[\u{0660}-\u{0669}\u{0966}-\u{096F}\u{FF10}-\u{FF19}]{8}") {
        prop_assert!(!catalog::value_matches("KVK", &digits));

        let mut form = IdentifierForm::new();
        form.set_country("NL");
        form.select_type("KVK").expect("offered");
        form.set_value(&digits);
        prop_assert!(!form.can_save());
    }

    #[test]
    fn normalization_is_idempotent(kind_idx in 0usize..KINDS.len(), value in "[ a-zA-Z0-9.-]{0,24}") {
        let code = KINDS[kind_idx].code;
        let once = catalog::normalize_value(code, &value);
        prop_assert_eq!(catalog::normalize_value(code, &once), once.clone());
        prop_assert_eq!(catalog::value_matches(code, &value), catalog::value_matches(code, &once));
    }

    #[test]
    fn selected_type_is_always_offered(country in "[A-Za-z]{0,2}", pick in 0usize..8, next in "[A-Za-z]{0,2}") {
        let mut form = IdentifierForm::new();
        form.set_country(&country);
        let offered = form.available_types();
        let _ = form.select_type(offered[pick % offered.len()]);
        form.set_country(&next);

        if let Some(selected) = form.identifier_type() {
            prop_assert!(form.available_types().iter().any(|t| *t == selected));
        }
    }

    #[test]
    fn saveable_forms_produce_matching_payloads(digits in "[0-9]{1,10}") {
        let mut form = IdentifierForm::new();
        form.set_country("NL");
        form.select_type("KVK").expect("offered");
        form.set_value(&digits);

        prop_assert_eq!(form.can_save(), digits.len() == 8);
        prop_assert_eq!(form.to_payload().is_ok(), form.can_save());
    }
}
