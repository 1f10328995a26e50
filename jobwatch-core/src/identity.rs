use crate::types::{Posting, PostingKey};

/// Derive the stable identity fingerprint for a posting.
///
/// Title, company and location are concatenated without a separator and
/// hashed; time posted, job type and link are deliberately excluded so they
/// can change between scrapes without minting a new record. Location must
/// already have its absent-value default applied.
pub fn posting_key(title: &str, company: &str, location: &str) -> PostingKey {
    let fingerprint = format!("{title}{company}{location}");
    PostingKey::new(format!("{:x}", md5::compute(fingerprint.as_bytes())))
}

pub fn key_for(posting: &Posting) -> PostingKey {
    posting_key(&posting.title, &posting.company, &posting.location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LOCATION_NOT_SPECIFIED;

    #[test]
    fn identical_triples_hash_identically() {
        let a = posting_key("Engineer", "Acme", "Remote");
        let b = posting_key("Engineer", "Acme", "Remote");
        assert_eq!(a, b);
    }

    #[test]
    fn any_field_change_changes_the_key() {
        let base = posting_key("Engineer", "Acme", "Remote");
        assert_ne!(base, posting_key("Engineer II", "Acme", "Remote"));
        assert_ne!(base, posting_key("Engineer", "Acme Inc", "Remote"));
        assert_ne!(base, posting_key("Engineer", "Acme", "Berlin"));
    }

    #[test]
    fn key_is_fixed_length_lowercase_hex() {
        let key = posting_key("Engineer", "Acme", "Remote");
        assert_eq!(key.as_str().len(), 32);
        assert!(key
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn empty_fields_are_valid_input() {
        let key = posting_key("", "", "");
        assert_eq!(key.as_str().len(), 32);
    }

    #[test]
    fn defaulted_location_hashes_like_an_explicit_one() {
        let defaulted = posting_key("Engineer", "Acme", LOCATION_NOT_SPECIFIED);
        let explicit = posting_key("Engineer", "Acme", "Location not specified");
        assert_eq!(defaulted, explicit);
    }
}
