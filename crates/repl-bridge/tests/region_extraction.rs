mod common;

use common::lines;
use pretty_assertions::assert_eq;
use repl_bridge::{
    ChunkBounds, ChunkPattern, CursorPosition, ExtractionError, RegionExtractor, RegionKind,
    ReplLanguage, SelectionBounds, TextDocument,
};

fn fence_extractor() -> RegionExtractor {
    RegionExtractor::new(ChunkPattern::new(r"^```\{", r"^```\s*$").unwrap())
}

fn r_extractor() -> RegionExtractor {
    let lang = ReplLanguage::R;
    RegionExtractor::new(ChunkPattern::new(lang.chunk_start, lang.chunk_end).unwrap())
}

fn notebook() -> TextDocument {
    TextDocument::from_lines([
        "# Title",         // 1
        "",                // 2
        "```{r setup}",    // 3
        "library(stats)",  // 4
        "",                // 5
        "```",             // 6
        "Some prose.",     // 7
        "```{r}",          // 8
        "x <- 1",          // 9
        "y <- x + 1",      // 10
        "```",             // 11
        "More prose.",     // 12
        "```{r plot}",     // 13
        "plot(y)",         // 14
        "```",             // 15
    ])
}

fn at(line: usize) -> CursorPosition {
    CursorPosition::new(line, 0)
}

#[test]
fn test_chunk_between_fences() {
    let doc = lines(&["```{lang}", "x=1", "y=2", "```"]);
    let region = fence_extractor()
        .extract(RegionKind::Chunk, &doc, at(2), None)
        .unwrap();
    assert_eq!(region.kind, RegionKind::Chunk);
    assert_eq!(region.lines, lines(&["x=1", "y=2"]));
}

#[test]
fn test_chunk_excludes_delimiters_and_keeps_blank_lines() {
    let region = r_extractor()
        .extract(RegionKind::Chunk, &notebook(), at(4), None)
        .unwrap();
    assert_eq!(region.lines, lines(&["library(stats)", ""]));
}

#[test]
fn test_chunk_from_either_delimiter_line() {
    let doc = notebook();
    let ex = r_extractor();
    let expected = lines(&["x <- 1", "y <- x + 1"]);

    for line in [8, 9, 10, 11] {
        let region = ex.extract(RegionKind::Chunk, &doc, at(line), None).unwrap();
        assert_eq!(region.lines, expected, "cursor on line {}", line);
    }
    assert_eq!(ex.chunk_bounds(&doc, 8), Ok(ChunkBounds { start: 8, end: 11 }));
}

#[test]
fn test_cursor_between_chunks_is_invalid_context() {
    let err = r_extractor()
        .extract(RegionKind::Chunk, &notebook(), at(7), None)
        .unwrap_err();
    assert_eq!(
        err,
        ExtractionError::CursorOutsideChunk {
            cursor_line: 7,
            start: 3,
            end: 6,
        }
    );
}

#[test]
fn test_chunk_without_start_above_cursor() {
    let err = r_extractor()
        .extract(RegionKind::Chunk, &notebook(), at(1), None)
        .unwrap_err();
    assert_eq!(err, ExtractionError::ChunkStartNotFound { cursor_line: 1 });
}

#[test]
fn test_unclosed_chunk() {
    let doc = lines(&["```{r}", "x <- 1", "y <- 2"]);
    let err = r_extractor()
        .extract(RegionKind::Chunk, &doc, at(2), None)
        .unwrap_err();
    assert_eq!(err, ExtractionError::ChunkEndNotFound { start: 1 });
}

#[test]
fn test_chunk_extraction_is_idempotent() {
    let doc = notebook();
    let ex = r_extractor();
    let first = ex.extract(RegionKind::Chunk, &doc, at(14), None);
    let second = ex.extract(RegionKind::Chunk, &doc, at(14), None);
    assert_eq!(first, second);
    assert_eq!(first.unwrap().lines, lines(&["plot(y)"]));
}

#[test]
fn test_next_chunk_start() {
    let doc = notebook();
    let ex = r_extractor();
    assert_eq!(ex.next_chunk_start(&doc, 6), Some(8));
    assert_eq!(ex.next_chunk_start(&doc, 11), Some(13));
    assert_eq!(ex.next_chunk_start(&doc, 15), None);
}

#[test]
fn test_line_region() {
    let doc = notebook();
    let ex = r_extractor();
    let region = ex.extract(RegionKind::Line, &doc, at(9), None).unwrap();
    assert_eq!(region.lines, lines(&["x <- 1"]));

    let blank = ex.extract(RegionKind::Line, &doc, at(2), None).unwrap();
    assert!(blank.is_empty());
}

#[test]
fn test_single_line_selection_is_exact_substring() {
    let doc = lines(&["value <- compute(alpha, beta)"]);
    let selection = SelectionBounds::new(CursorPosition::new(1, 9), CursorPosition::new(1, 16));
    let region = r_extractor()
        .extract(RegionKind::Selection, &doc, at(1), Some(selection))
        .unwrap();
    assert_eq!(region.lines, lines(&["compute"]));
}

#[test]
fn test_multi_line_selection_trims_first_and_last_line() {
    let doc = lines(&["a <- foo(1,", "  2,", "  3) # tail"]);
    let selection = SelectionBounds::new(CursorPosition::new(1, 5), CursorPosition::new(3, 4));
    let region = r_extractor()
        .extract(RegionKind::Selection, &doc, at(1), Some(selection))
        .unwrap();
    assert_eq!(region.lines, lines(&["foo(1,", "  2,", "  3)"]));
}

#[test]
fn test_reversed_selection_is_normalized() {
    let doc = lines(&["abcdef"]);
    let selection = SelectionBounds::new(CursorPosition::new(1, 4), CursorPosition::new(1, 1));
    let region = r_extractor()
        .extract(RegionKind::Selection, &doc, at(1), Some(selection))
        .unwrap();
    assert_eq!(region.lines, lines(&["bcd"]));
}

#[test]
fn test_whole_line_selection_and_blank_selection() {
    let doc = lines(&["first", "   ", "third"]);
    let ex = r_extractor();

    let region = ex
        .extract(RegionKind::Selection, &doc, at(1), Some(SelectionBounds::lines(1, 3)))
        .unwrap();
    assert_eq!(region.lines, lines(&["first", "   ", "third"]));

    let blank = ex
        .extract(RegionKind::Selection, &doc, at(2), Some(SelectionBounds::lines(2, 2)))
        .unwrap();
    assert!(blank.lines.is_empty());
}

#[test]
fn test_selection_required() {
    let doc = lines(&["x"]);
    let err = r_extractor()
        .extract(RegionKind::Selection, &doc, at(1), None)
        .unwrap_err();
    assert_eq!(err, ExtractionError::NoSelection);
}

#[test]
fn test_previous_chunks_in_document_order_without_blanks() {
    let region = r_extractor()
        .extract(RegionKind::PreviousChunks, &notebook(), at(15), None)
        .unwrap();
    assert_eq!(
        region.lines,
        lines(&["library(stats)", "x <- 1", "y <- x + 1", "plot(y)"])
    );
}

#[test]
fn test_previous_chunks_stop_at_cursor_line() {
    let region = r_extractor()
        .extract(RegionKind::PreviousChunks, &notebook(), at(9), None)
        .unwrap();
    assert_eq!(region.lines, lines(&["library(stats)", "x <- 1"]));
}

#[test]
fn test_previous_chunks_grow_monotonically() {
    let doc = notebook();
    let ex = r_extractor();
    for line in 1..15 {
        let shorter = ex.previous_chunks(&doc, line);
        let longer = ex.previous_chunks(&doc, line + 1);
        assert!(
            longer.starts_with(&shorter),
            "line {} -> {}: {:?} vs {:?}",
            line,
            line + 1,
            shorter,
            longer
        );
    }
}

#[test]
fn test_previous_chunks_tolerate_missing_end() {
    let doc = lines(&["```{r}", "a", "```{r}", "b", "```", "prose", "```{r}", "c"]);
    let region = r_extractor()
        .extract(RegionKind::PreviousChunks, &doc, at(8), None)
        .unwrap();
    assert_eq!(region.lines, lines(&["a", "b", "c"]));
}

#[test]
fn test_chunk_keeps_form_feeds_and_unicode_separators() {
    let doc = TextDocument::from_text("```{r}\nx <- 1\x0c\ny <- 'a\u{2028}b'\n```");
    let region = r_extractor()
        .extract(RegionKind::Chunk, &doc, at(2), None)
        .unwrap();
    assert_eq!(region.lines, lines(&["x <- 1\x0c", "y <- 'a\u{2028}b'"]));
}
