use super::enums::Context;

/// Separates independent fragments within one raw call string.
pub const FRAGMENT_DELIMITER: char = ',';
/// Separates the two mates of a paired-end fragment.
pub const MATE_DELIMITER: char = ';';

/// Per-context fragment lists derived from raw per-read call strings.
///
/// A raw call string carries one code per reference-aligned base:
///
/// | code  | meaning                            |
/// |-------|------------------------------------|
/// | `z`/`Z` | CpG, unmethylated/methylated     |
/// | `x`/`X` | CHG, unmethylated/methylated     |
/// | `h`/`H` | CHH, unmethylated/methylated     |
/// | `u`/`U` | ambiguous context, discarded     |
/// | `.`   | non-cytosine position, discarded   |
/// | `,`   | fragment delimiter                 |
/// | `;`   | paired-end mate delimiter          |
///
/// Normalization folds CHG into CH, resolves the mate delimiter according
/// to the requested mate handling, splits the remainder into per-fragment
/// strings per context and drops fragments that end up empty. Codes outside
/// the documented alphabet are discarded like `.`. Any input, including the
/// empty string, normalizes without error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextFragments {
    ch: Vec<String>,
    cg: Vec<String>,
}

impl ContextFragments {
    /// Normalizes a single raw call string.
    ///
    /// With `merge_mates` set, the two mates of a paired-end fragment are
    /// joined into one fragment; otherwise they become two independent
    /// fragments.
    pub fn from_raw(
        raw: &str,
        merge_mates: bool,
    ) -> Self {
        Self::from_fragments([raw], merge_mates)
    }

    /// Normalizes an ordered collection of raw call strings, as accumulated
    /// by a bin buffer. Equivalent to normalizing the strings joined with
    /// the fragment delimiter.
    pub fn from_fragments<'a, I>(
        raw: I,
        merge_mates: bool,
    ) -> Self
    where
        I: IntoIterator<Item = &'a str>, {
        let mut ch = Vec::new();
        let mut cg = Vec::new();
        let mut ch_cur = String::new();
        let mut cg_cur = String::new();

        let mut take = |ch_cur: &mut String, cg_cur: &mut String| {
            if !ch_cur.is_empty() {
                ch.push(std::mem::take(ch_cur));
            }
            if !cg_cur.is_empty() {
                cg.push(std::mem::take(cg_cur));
            }
        };

        for fragment in raw {
            for code in fragment.chars() {
                match code {
                    // CHG folds into CH before the tracks separate
                    'h' | 'x' => ch_cur.push('h'),
                    'H' | 'X' => ch_cur.push('H'),
                    'z' => cg_cur.push('z'),
                    'Z' => cg_cur.push('Z'),
                    MATE_DELIMITER if merge_mates => {},
                    FRAGMENT_DELIMITER | MATE_DELIMITER => {
                        take(&mut ch_cur, &mut cg_cur)
                    },
                    // '.', 'u'/'U' and anything undocumented
                    _ => {},
                }
            }
            take(&mut ch_cur, &mut cg_cur);
        }

        Self { ch, cg }
    }

    /// Fragment strings of the requested context.
    pub fn fragments(
        &self,
        context: Context,
    ) -> &[String] {
        match context {
            Context::CH => &self.ch,
            Context::CG => &self.cg,
        }
    }

    /// True when neither context retained any fragment.
    pub fn is_empty(&self) -> bool {
        self.ch.is_empty() && self.cg.is_empty()
    }
}
