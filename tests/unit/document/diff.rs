use super::*;
use crate::document::token::{LexTokenizer, Tokenizer};

fn toks(s: &str) -> Vec<Token> {
    LexTokenizer.tokenize(s, "javascript")
}

fn render(left: &[Token], right: &[Token], diff: &[TokenCorrespondence]) -> Vec<String> {
    diff.iter()
        .map(|c| match c.kind().unwrap() {
            CorrespondenceKind::Moved { left: l, right: r } => {
                assert_eq!(left[l].text, right[r].text);
                format!("={}", left[l].text)
            }
            CorrespondenceKind::Removed(l) => format!("-{}", left[l].text),
            CorrespondenceKind::Added(r) => format!("+{}", right[r].text),
        })
        .collect()
}

#[test]
fn identical_lists_are_all_moved() {
    let a = toks("const a = 1;");
    let d = LcsDiff::default().diff(&a, &a);
    assert_eq!(render(&a, &a, &d), vec!["=const", "=a", "==", "=1", "=;"]);
}

#[test]
fn replaced_literal_is_removed_then_added() {
    let a = toks("const a = 1;");
    let b = toks("const a = 2;");
    let d = LcsDiff::default().diff(&a, &b);
    assert_eq!(
        render(&a, &b, &d),
        vec!["=const", "=a", "==", "-1", "+2", "=;"]
    );
}

#[test]
fn insertion_in_the_middle_keeps_order() {
    let a = toks("f(x)");
    let b = toks("f(x, y)\ng()");
    let d = LcsDiff::default().diff(&a, &b);
    assert_eq!(
        render(&a, &b, &d),
        vec!["=f", "=(", "=x", "+,", "+y", "+)", "+g", "+(", "=)"]
    );
}

#[test]
fn blank_tokens_never_appear() {
    let a = toks("a  b\n c");
    let b = toks("a b c");
    let d = LcsDiff::default().diff(&a, &b);
    for c in &d {
        if let Some(l) = c.left {
            assert!(!a[l].kind.is_blank());
        }
        if let Some(r) = c.right {
            assert!(!b[r].kind.is_blank());
        }
    }
    assert_eq!(d.len(), 3);
}

#[test]
fn oversized_middle_falls_back_to_replace() {
    let a = toks("p x y q");
    let b = toks("p y x q");
    let d = LcsDiff { max_cells: 1 }.diff(&a, &b);
    assert_eq!(
        render(&a, &b, &d),
        vec!["=p", "-x", "-y", "+y", "+x", "=q"]
    );
}

#[test]
fn empty_sides() {
    let a = toks("");
    let b = toks("x y");
    let d = LcsDiff::default().diff(&a, &b);
    assert_eq!(render(&a, &b, &d), vec!["+x", "+y"]);
    let d = LcsDiff::default().diff(&b, &a);
    assert_eq!(render(&b, &a, &d), vec!["-x", "-y"]);
}
