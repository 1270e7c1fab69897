/// Length of every message label.
pub const LABEL_LEN: usize = 4;

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// A message label: exactly four ASCII characters.
///
/// Labels identify a message within its severity; together with a
/// [`ReportType`](crate::ReportType) they form the full identity of a code.
/// Construction never fails: input of any other length is replaced by a
/// label deterministically derived from a hash of the input text.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label([u8; LABEL_LEN]);

impl Label {
    /// Builds a label from arbitrary text.
    ///
    /// Exactly four ASCII characters pass through verbatim; anything else
    /// falls back to [`Label::derived`] over the whole input.
    pub fn new(text: &str) -> Label {
        let bytes = text.as_bytes();
        if bytes.len() == LABEL_LEN && bytes.iter().all(u8::is_ascii) {
            let mut buf = [0u8; LABEL_LEN];
            buf.copy_from_slice(bytes);
            Label(buf)
        } else {
            Label::derived(text)
        }
    }

    /// Derives a label from seed text via a stable string hash.
    ///
    /// The hash is FNV-1a (32-bit), so the same seed yields the same label
    /// in every process and on every platform. Uniqueness is probabilistic;
    /// collisions are accepted, not errors.
    pub fn derived(seed: &str) -> Label {
        let mut buf = [0u8; LABEL_LEN];
        hash_letters(seed, &mut buf);
        Label(buf)
    }

    pub fn as_str(&self) -> &str {
        // Always ASCII by construction.
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Label({})", self.as_str())
    }
}

/// Fills `out` with upper-case letters derived from a hash of `seed`.
///
/// Each letter consumes the low five bits of the running hash value,
/// mapped onto `'A' + (bits % 26)`, after which the hash shifts right
/// by five bits.
pub fn hash_letters(seed: &str, out: &mut [u8]) {
    let mut h = fnv1a32(seed.as_bytes());
    for slot in out.iter_mut() {
        let bits = h & 0x1f;
        *slot = b'A' + (bits % 26) as u8;
        h >>= 5;
    }
}

fn fnv1a32(data: &[u8]) -> u32 {
    let mut h = FNV_OFFSET;
    for &b in data {
        h ^= u32::from(b);
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_ascii_chars_pass_through() {
        assert_eq!(Label::new("CURL").as_str(), "CURL");
        assert_eq!(Label::new("x+1!").as_str(), "x+1!");
    }

    #[test]
    fn other_lengths_are_hash_derived_not_rejected() {
        let short = Label::new("AB");
        let long = Label::new("ABCDEF");
        assert_eq!(short.as_str().len(), LABEL_LEN);
        assert_eq!(long.as_str().len(), LABEL_LEN);
        assert_eq!(short, Label::derived("AB"));
        assert_eq!(long, Label::derived("ABCDEF"));
    }

    #[test]
    fn derivation_is_stable() {
        // Pinned value: FNV-1a("") is 0x811c9dc5, which unpacks to these
        // letters five bits at a time. A reimplementation must reproduce it.
        assert_eq!(Label::derived("").as_str(), "FOHZ");
        assert_eq!(Label::derived("x"), Label::derived("x"));
        assert_ne!(Label::derived("x"), Label::derived("y"));
    }

    #[test]
    fn derived_labels_are_uppercase_letters() {
        for seed in ["", "a", "some longer seed text", "ns:http://example.com/"] {
            let label = Label::derived(seed);
            assert!(label.as_str().bytes().all(|b| b.is_ascii_uppercase()));
        }
    }
}
