use proptest::prelude::*;

use ragdb_core::chunker::{chunk, chunk_spans};

fn size_and_overlap() -> impl Strategy<Value = (usize, usize)> {
    (1usize..60).prop_flat_map(|size| (Just(size), 0..size))
}

proptest! {
    #[test]
    fn spans_cover_text_without_gaps(text in "[a-z .!?]{1,300}", (size, overlap) in size_and_overlap()) {
        let len = text.chars().count();
        let spans = chunk_spans(&text, size, overlap).unwrap();

        prop_assert_eq!(spans.first().map(|s| s.start), Some(0));
        prop_assert_eq!(spans.last().map(|s| s.end), Some(len));
        for span in &spans {
            prop_assert!(span.end > span.start);
            prop_assert!(span.end - span.start <= size);
        }
        for pair in spans.windows(2) {
            prop_assert!(pair[1].start > pair[0].start, "cursor must strictly advance");
            prop_assert!(pair[1].start <= pair[0].end, "gap between {:?} and {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn iterations_are_bounded_by_text_length(text in "[a-z .!?]{1,300}", (size, overlap) in size_and_overlap()) {
        let spans = chunk_spans(&text, size, overlap).unwrap();
        prop_assert!(spans.len() <= text.chars().count());
    }

    #[test]
    fn unbroken_text_takes_at_most_ceil_len_over_step(text in "[a-z]{1,300}", (size, overlap) in size_and_overlap()) {
        let len = text.chars().count();
        let spans = chunk_spans(&text, size, overlap).unwrap();
        let step = size - overlap;
        prop_assert!(spans.len() <= len.div_ceil(step));
    }

    #[test]
    fn chunks_are_never_blank(text in "[a-z \n]{0,200}", (size, overlap) in size_and_overlap()) {
        for piece in chunk(&text, size, overlap).unwrap() {
            prop_assert!(!piece.trim().is_empty());
        }
    }
}

#[test]
fn overlap_one_below_size_still_terminates() {
    let text = "word word word. another sentence here! and a question? ".repeat(20);
    let len = text.chars().count();
    for size in [2usize, 3, 10, 25] {
        let spans = chunk_spans(&text, size, size - 1).unwrap();
        assert!(spans.len() <= len);
        assert_eq!(spans.last().unwrap().end, len);
        for pair in spans.windows(2) {
            assert!(pair[1].start > pair[0].start);
            assert!(pair[1].start <= pair[0].end);
        }
    }
}

#[test]
fn chunk_size_one_emits_every_character() {
    let pieces = chunk("abc", 1, 0).unwrap();
    assert_eq!(pieces, vec!["a", "b", "c"]);
}
