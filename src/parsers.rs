#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

peg::parser! {
    /// Grammars for harness transcripts and the external penalties source.
    pub grammar parser() for str {
        /// matches any number of spaces and tabs
        rule whitespace() = quiet!{[' ' | '\t' | '\r']+}

        /// matches an optionally signed floating point number
        rule float() -> f64
            = n:$("-"? ['0'..='9']+ ("." ['0'..='9']+)?) {? n.parse().or(Err("f64")) }

        /// parses a line containing only a numeric score, the harness's
        /// own convention for its final line of output
        pub rule score_line() -> f64
            = whitespace()? n:float() whitespace()? ![_] { n }

        /// matches one delimited field, up to but not including a comma
        rule field() -> &'input str
            = f:$((!"," [_])+) { f }

        /// parses one row of the external penalties source:
        /// `studentIdentifier,value[,reason]`. The reason keeps any commas
        /// it contains.
        pub rule penalty_row() -> (String, f64, Option<String>)
            = id:field() "," whitespace()? value:float() whitespace()?
              reason:("," r:$([_]*) { r })? ![_]
            {
                let reason = reason
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(String::from);
                (id.trim().to_string(), value, reason)
            }
    }
}

/// Extracts the trailing numeric score from a harness transcript.
///
/// Returns `None` when the last non-empty line is not a bare number, so
/// callers can tell "could not measure" apart from a genuine `0.0`.
pub fn final_score(output: &str) -> Option<f64> {
    output
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .and_then(|line| parser::score_line(line).ok())
}
