use super::*;

fn kinds(tokens: &[Token]) -> Vec<(String, TokenKind)> {
    tokens
        .iter()
        .filter(|t| !t.kind.is_blank())
        .map(|t| (t.text.clone(), t.kind))
        .collect()
}

fn joined(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

#[test]
fn rust_keywords_literals_and_punctuation() {
    let src = "let x = 42; // answer\nfn f(c: char) -> &'static str { 'a'; \"s\" }";
    let toks = LexTokenizer.tokenize(src, "rust");
    assert_eq!(joined(&toks), src);
    let k = kinds(&toks);
    assert_eq!(k[0], ("let".to_owned(), TokenKind::Keyword));
    assert_eq!(k[1], ("x".to_owned(), TokenKind::Identifier));
    assert_eq!(k[3], ("42".to_owned(), TokenKind::Number));
    assert_eq!(k[5], ("// answer".to_owned(), TokenKind::Comment));
    assert!(k.contains(&("'a'".to_owned(), TokenKind::String)));
    assert!(k.contains(&("\"s\"".to_owned(), TokenKind::String)));
    // lifetimes stay punctuation + keyword
    assert!(k.contains(&("static".to_owned(), TokenKind::Keyword)));
}

#[test]
fn newlines_are_single_tokens() {
    let toks = LexTokenizer.tokenize("a\n\n  b", "plaintext");
    let shape: Vec<TokenKind> = toks.iter().map(|t| t.kind).collect();
    assert_eq!(
        shape,
        vec![
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::Newline,
            TokenKind::Whitespace,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn block_comments_are_split_per_line() {
    let src = "/* one\ntwo */ x";
    let toks = LexTokenizer.tokenize(src, "javascript");
    assert_eq!(joined(&toks), src);
    assert_eq!(toks[0], Token::new("/* one", TokenKind::Comment));
    assert_eq!(toks[1].kind, TokenKind::Newline);
    assert_eq!(toks[2], Token::new("two */", TokenKind::Comment));
    assert!(toks.iter().all(|t| t.kind == TokenKind::Newline || !t.text.contains('\n')));
}

#[test]
fn python_uses_hash_comments() {
    let toks = LexTokenizer.tokenize("def f(): # hi", "python");
    let k = kinds(&toks);
    assert_eq!(k[0], ("def".to_owned(), TokenKind::Keyword));
    assert_eq!(k.last().unwrap(), &("# hi".to_owned(), TokenKind::Comment));
}

#[test]
fn unterminated_string_stops_at_line_end() {
    let toks = LexTokenizer.tokenize("\"open\nnext", "javascript");
    assert_eq!(toks[0], Token::new("\"open", TokenKind::String));
    assert_eq!(toks[1].kind, TokenKind::Newline);
}
