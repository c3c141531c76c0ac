//! Compliance sanitization of schema text
//!
//! Removes every CHECK clause, with or without a `CONSTRAINT <name>` prefix,
//! then repairs the commas the removal leaves behind. The text is lexed with
//! the `sqlparser` tokenizer and every kept token is re-emitted from its
//! source slice, so quoted strings, quoted identifiers and comments come out
//! byte for byte. The passes repeat until the text stops changing, which
//! makes sanitizing twice the same as sanitizing once.

use sqlparser::dialect::SQLiteDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Location, Token, Tokenizer, Whitespace, Word};
use tracing::warn;

/// A token and the exact source text it was lexed from
struct Piece<'a> {
    token: Token,
    text: &'a str,
}

/// Strip CHECK clauses and clean up the resulting commas
///
/// Text the SQLite tokenizer rejects (an unterminated string or comment) is
/// returned unchanged.
pub fn sanitize_schema(sql: &str) -> String {
    let mut current = sql.to_string();
    loop {
        let Some(pieces) = lex(&current) else {
            return current;
        };
        let next = clean_commas(strip_check_clauses(&pieces));
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Whether the text still contains a CHECK clause outside quotes and comments
pub fn contains_check_clause(sql: &str) -> bool {
    lex(sql).is_some_and(|pieces| (0..pieces.len()).any(|i| check_clause_end(&pieces, i).is_some()))
}

fn lex(sql: &str) -> Option<Vec<Piece<'_>>> {
    let dialect = SQLiteDialect {};
    let tokens = match Tokenizer::new(&dialect, sql).tokenize_with_location() {
        Ok(tokens) => tokens,
        Err(error) => {
            warn!(%error, "Schema text could not be tokenized, left unchanged");
            return None;
        }
    };

    let mut cursor = Cursor::new(sql);
    let mut start = 0;
    let last = tokens.len().saturating_sub(1);
    let pieces = tokens
        .into_iter()
        .enumerate()
        .map(|(idx, t)| {
            let end = if idx == last {
                sql.len()
            } else {
                cursor.advance_to(t.span.end)
            };
            let text = &sql[start..end];
            start = end;
            Piece {
                token: t.token,
                text,
            }
        })
        .collect();
    Some(pieces)
}

/// Maps tokenizer locations (1-based line, 1-based char column) to byte offsets
struct Cursor<'a> {
    chars: std::str::CharIndices<'a>,
    len: usize,
    offset: usize,
    at: Location,
}

impl<'a> Cursor<'a> {
    fn new(sql: &'a str) -> Self {
        Self {
            chars: sql.char_indices(),
            len: sql.len(),
            offset: 0,
            at: Location { line: 1, column: 1 },
        }
    }

    fn advance_to(&mut self, target: Location) -> usize {
        while self.at < target {
            let Some((idx, ch)) = self.chars.next() else {
                self.offset = self.len;
                break;
            };
            self.offset = idx + ch.len_utf8();
            if ch == '\n' {
                self.at.line += 1;
                self.at.column = 1;
            } else {
                self.at.column += 1;
            }
        }
        self.offset
    }
}

fn strip_check_clauses<'p, 'a>(pieces: &'p [Piece<'a>]) -> Vec<&'p Piece<'a>> {
    let mut out: Vec<&Piece> = Vec::with_capacity(pieces.len());
    let mut i = 0;
    while i < pieces.len() {
        if let Some(end) = check_clause_end(pieces, i) {
            // blanks before the clause go with it; comments stay
            while out.last().is_some_and(|p| is_blank(&p.token)) {
                out.pop();
            }
            i = end;
            continue;
        }
        out.push(&pieces[i]);
        i += 1;
    }
    out
}

/// Drop commas left next to `(`, `)` or another comma
fn clean_commas(pieces: Vec<&Piece<'_>>) -> String {
    let mut out: Vec<&Piece> = Vec::with_capacity(pieces.len());
    let mut skip_blank = false;

    for piece in pieces {
        if skip_blank && is_blank(&piece.token) {
            continue;
        }
        skip_blank = false;

        match piece.token {
            Token::Comma => match last_significant(&out) {
                Some(Token::Comma) => continue,
                Some(Token::LParen) => {
                    skip_blank = true;
                    continue;
                }
                _ => {}
            },
            Token::RParen => {
                if let Some(idx) = out.iter().rposition(|p| !is_trivia(&p.token))
                    && matches!(out[idx].token, Token::Comma)
                {
                    out.remove(idx);
                }
            }
            _ => {}
        }
        out.push(piece);
    }

    out.iter().map(|p| p.text).collect()
}

/// Index just past a CHECK clause (optionally prefixed by
/// `CONSTRAINT <name>`) starting at `start`
fn check_clause_end(pieces: &[Piece<'_>], start: usize) -> Option<usize> {
    let mut pos = start;
    if is_keyword(&pieces[pos].token, Keyword::CONSTRAINT) {
        let name = next_significant(pieces, pos + 1)?;
        if !matches!(
            pieces[name].token,
            Token::Word(_) | Token::SingleQuotedString(_)
        ) {
            return None;
        }
        pos = next_significant(pieces, name + 1)?;
    }
    if !is_keyword(&pieces[pos].token, Keyword::CHECK) {
        return None;
    }
    let open = next_significant(pieces, pos + 1)?;
    if !matches!(pieces[open].token, Token::LParen) {
        return None;
    }

    let mut depth = 0usize;
    for (idx, piece) in pieces.iter().enumerate().skip(open) {
        match piece.token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn next_significant(pieces: &[Piece<'_>], from: usize) -> Option<usize> {
    (from..pieces.len()).find(|&i| !is_trivia(&pieces[i].token))
}

fn last_significant<'t>(out: &[&'t Piece<'_>]) -> Option<&'t Token> {
    out.iter()
        .rev()
        .map(|p| &p.token)
        .find(|t| !is_trivia(t))
}

fn is_keyword(token: &Token, keyword: Keyword) -> bool {
    matches!(token, Token::Word(Word { keyword: k, quote_style: None, .. }) if *k == keyword)
}

/// Whitespace or a comment
fn is_trivia(token: &Token) -> bool {
    matches!(token, Token::Whitespace(_))
}

/// Whitespace that is not a comment
fn is_blank(token: &Token) -> bool {
    matches!(
        token,
        Token::Whitespace(Whitespace::Space | Whitespace::Newline | Whitespace::Tab)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_check_removed() {
        let sql = "CREATE TABLE t (\n  \"price\" REAL CHECK (price > 0) NOT NULL\n);";
        assert_eq!(
            sanitize_schema(sql),
            "CREATE TABLE t (\n  \"price\" REAL NOT NULL\n);"
        );
    }

    #[test]
    fn test_named_constraint_removed() {
        let sql = "CREATE TABLE t (\n  a INTEGER,\n  CONSTRAINT positive_a CHECK (a > 0),\n  b TEXT\n);";
        assert_eq!(
            sanitize_schema(sql),
            "CREATE TABLE t (\n  a INTEGER,\n  b TEXT\n);"
        );
    }

    #[test]
    fn test_trailing_table_check_removed() {
        let sql = "CREATE TABLE t (\n  a INTEGER,\n  CHECK (a IN (1, 2, 3))\n);";
        assert_eq!(sanitize_schema(sql), "CREATE TABLE t (\n  a INTEGER\n);");
    }

    #[test]
    fn test_leading_table_check_removed() {
        let sql = "CREATE TABLE t (CHECK (a > 0), a INTEGER)";
        assert_eq!(sanitize_schema(sql), "CREATE TABLE t (a INTEGER)");
    }

    #[test]
    fn test_nested_parentheses_and_case() {
        let sql = "CREATE TABLE t (a INTEGER check((a > 0) AND (a < length(')'))), b TEXT)";
        assert_eq!(sanitize_schema(sql), "CREATE TABLE t (a INTEGER, b TEXT)");
    }

    #[test]
    fn test_quoted_text_untouched() {
        let sql = "CREATE TABLE t (\"CHECK\" TEXT DEFAULT 'CHECK (x), ,)', [check (y)] INTEGER)";
        assert_eq!(sanitize_schema(sql), sql);
    }

    #[test]
    fn test_comment_untouched() {
        let sql = "-- CHECK (x) stays, ,\nCREATE TABLE t (a INTEGER)";
        assert_eq!(sanitize_schema(sql), sql);
    }

    #[test]
    fn test_check_after_comment_keeps_newline() {
        let sql = "CREATE TABLE t (a INTEGER -- note\n CHECK (a > 0), b TEXT)";
        let cleaned = sanitize_schema(sql);
        assert_eq!(cleaned, "CREATE TABLE t (a INTEGER -- note\n, b TEXT)");
        assert!(!contains_check_clause(&cleaned));
    }

    #[test]
    fn test_identifier_containing_check_untouched() {
        let sql = "CREATE TABLE t (checked INTEGER, recheck TEXT)";
        assert_eq!(sanitize_schema(sql), sql);
    }

    #[test]
    fn test_other_constraints_untouched() {
        let sql = "CREATE TABLE t (a INTEGER, CONSTRAINT u UNIQUE (a))";
        assert_eq!(sanitize_schema(sql), sql);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "CREATE TABLE t (a INTEGER CHECK (a > 0),, CONSTRAINT \"c\" CHECK (a < 9),\n)",
            "CREATE TABLE t (, a INTEGER,,, b TEXT ,)",
            "CREATE TABLE IF NOT EXISTS \"x\" (\n  \"id\" INTEGER PRIMARY KEY AUTOINCREMENT\n);\n",
            "CHECK (unterminated",
        ];
        for input in inputs {
            let once = sanitize_schema(input);
            assert_eq!(sanitize_schema(&once), once, "input: {}", input);
        }
    }

    #[test]
    fn test_unterminated_check_left_alone() {
        assert_eq!(sanitize_schema("CHECK (unterminated"), "CHECK (unterminated");
    }

    #[test]
    fn test_comment_between_constraint_name_and_check() {
        let sql = "CREATE TABLE t (a INTEGER, CONSTRAINT c /*x*/ CHECK (a>0))";
        let cleaned = sanitize_schema(sql);
        assert_eq!(cleaned, "CREATE TABLE t (a INTEGER)");
        assert!(!cleaned.contains("CONSTRAINT"));
    }

    #[test]
    fn test_repeated_check_keyword_settles_in_one_call() {
        let sql = "CREATE TABLE t (a INTEGER CHECK CHECK (a)(b))";
        let once = sanitize_schema(sql);
        assert_eq!(once, "CREATE TABLE t (a INTEGER)");
        assert_eq!(sanitize_schema(&once), once);
    }

    #[test]
    fn test_escaped_quotes_reemitted_verbatim() {
        let sql = "CREATE TABLE \"a\"\"b\" (\"it\"\"s\" TEXT DEFAULT 'don''t' CHECK (1), n TEXT)";
        assert_eq!(
            sanitize_schema(sql),
            "CREATE TABLE \"a\"\"b\" (\"it\"\"s\" TEXT DEFAULT 'don''t', n TEXT)"
        );
    }

    #[test]
    fn test_multibyte_text_preserved() {
        let sql = "CREATE TABLE \"préférés\" (\n  \"名前\" TEXT CHECK (length(\"名前\") > 0),\n  b TEXT\n);";
        assert_eq!(
            sanitize_schema(sql),
            "CREATE TABLE \"préférés\" (\n  \"名前\" TEXT,\n  b TEXT\n);"
        );
    }

    #[test]
    fn test_untokenizable_text_unchanged() {
        let sql = "CREATE TABLE t (a TEXT DEFAULT 'open CHECK (a)";
        assert_eq!(sanitize_schema(sql), sql);
        assert!(!contains_check_clause(sql));
    }

    #[test]
    fn test_contains_check_clause() {
        assert!(contains_check_clause("a INTEGER CHECK (a > 0)"));
        assert!(!contains_check_clause("a INTEGER DEFAULT 'CHECK (a)'"));
    }
}
