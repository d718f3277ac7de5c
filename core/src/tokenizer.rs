/// Split text into word tokens on Unicode whitespace.
///
/// Tokens are returned verbatim: no case folding, punctuation stripping or
/// stemming, so `"Cat"` and `"cat,"` are distinct words.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}
