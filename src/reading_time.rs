//! Estimates how long a post takes to read.

use crate::content::ContentBlock;

/// Average reading speed used for every estimate.
pub const WORDS_PER_MINUTE: usize = 200;

/// Counts the words in `content` and converts them to whole minutes, rounding
/// up. Words are the pieces between single spaces, so an empty string counts
/// as one word and runs of spaces count the empty pieces between them.
pub fn estimate_minutes(content: &[ContentBlock]) -> usize {
    let words: usize = content
        .iter()
        .map(|block| {
            count_words(&block.heading)
                + block
                    .body
                    .iter()
                    .map(|fragment| count_words(&fragment.text))
                    .sum::<usize>()
        })
        .sum();
    (words + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE
}

fn count_words(text: &str) -> usize {
    text.split(' ').count()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::content::BodyFragment;

    fn block(heading: &str, body: &[&str]) -> ContentBlock {
        ContentBlock {
            heading: heading.to_owned(),
            body: body
                .iter()
                .map(|text| BodyFragment::new("paragraph", text))
                .collect(),
        }
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_no_content() {
        assert_eq!(0, estimate_minutes(&[]));
    }

    #[test]
    fn test_heading_and_body_are_counted() {
        // 3 heading words + 2 body words
        assert_eq!(1, estimate_minutes(&[block("a b c", &["d e"])]));
    }

    #[test]
    fn test_rounds_up() {
        assert_eq!(1, estimate_minutes(&[block(&words(100), &[&words(100)])]));
        assert_eq!(2, estimate_minutes(&[block(&words(100), &[&words(101)])]));
        assert_eq!(
            3,
            estimate_minutes(&[
                block(&words(150), &[&words(150)]),
                block(&words(100), &[&words(100), &words(100)]),
            ])
        );
    }

    #[test]
    fn test_single_space_tokenization() {
        assert_eq!(1, count_words(""));
        assert_eq!(3, count_words("a  b"));
        assert_eq!(1, count_words("a\tb"));
    }

    #[test]
    fn test_monotonic_in_word_count() {
        let mut last = 0;
        for n in (1..1000).step_by(37) {
            let estimate = estimate_minutes(&[block(&words(n), &[])]);
            assert!(estimate >= last);
            last = estimate;
        }
    }
}
