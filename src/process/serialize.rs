// src/process/serialize.rs

use std::{
    borrow::Cow,
    io::{self, Write},
};

use crate::expansions::Year;

/// Double any embedded `"` so the quoted field reads back unchanged.
pub fn quote_name(name: &str) -> Cow<'_, str> {
    if name.contains('"') {
        Cow::Owned(name.replace('"', "\"\""))
    } else {
        Cow::Borrowed(name)
    }
}

/// Write one `"<name>",<year>\n` line.
pub fn write_card_line<W: Write>(mut out: W, name: &str, year: Year) -> io::Result<()> {
    writeln!(out, "\"{}\",{}", quote_name(name), year)
}

/// Write every entry in iteration order; returns the number of lines.
pub fn write_card_lines<'a, W, I>(mut out: W, entries: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, Year)>,
{
    let mut n = 0;
    for (name, year) in entries {
        write_card_line(&mut out, name, year)?;
        n += 1;
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        let mut buf = Vec::new();
        write_card_line(&mut buf, "Lightning Bolt", 2027).unwrap();
        assert_eq!(buf, b"\"Lightning Bolt\",2027\n");
    }

    #[test]
    fn test_commas_and_slashes_are_kept_verbatim() {
        let mut buf = Vec::new();
        write_card_line(&mut buf, "Fire // Ice, Reprinted", 2028).unwrap();
        assert_eq!(buf, b"\"Fire // Ice, Reprinted\",2028\n");
    }

    #[test]
    fn test_embedded_quote_is_doubled() {
        assert_eq!(quote_name("plain"), Cow::Borrowed("plain"));
        let mut buf = Vec::new();
        write_card_line(&mut buf, "\"Ach! Hans, Run!\"", 2027).unwrap();
        assert_eq!(buf, b"\"\"\"Ach! Hans, Run!\"\"\",2027\n");
    }

    #[test]
    fn test_write_lines_counts() {
        let mut buf = Vec::new();
        let n = write_card_lines(&mut buf, [("A", 2027), ("B", 2028)]).unwrap();
        assert_eq!(n, 2);
        assert_eq!(String::from_utf8(buf).unwrap(), "\"A\",2027\n\"B\",2028\n");
    }

    #[test]
    fn test_no_lines_for_empty_input() {
        let mut buf = Vec::new();
        let n = write_card_lines(&mut buf, std::iter::empty::<(&str, Year)>()).unwrap();
        assert_eq!(n, 0);
        assert!(buf.is_empty());
    }
}
