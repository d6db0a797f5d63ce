use std::io::{self, Write};

use crate::sentence::{Labels, Sentence, Tag};

fn iob_string(tag: Option<&Tag>) -> String {
    tag.map(|tag| tag.to_iob().to_string())
        .unwrap_or_else(|| Tag::outside().to_string())
}

/// Write the tags of a sentence in the input format of `conlleval`.
///
/// Each word is written on a line with its part-of-speech tag, the gold
/// tag, and the predicted tag. Tags are written in IOB encoding. The
/// sentence is terminated by an empty line.
pub fn write_conlleval<W>(
    write: &mut W,
    sentence: &Sentence,
    predicted: &Labels,
    gold: &Labels,
) -> io::Result<()>
where
    W: Write,
{
    for token in 1..sentence.len() {
        writeln!(
            write,
            "{} {} {} {}",
            sentence[token].form(),
            sentence[token].pos(),
            iob_string(gold.get(token)),
            iob_string(predicted.get(token))
        )?;
    }

    writeln!(write)
}

#[cfg(test)]
mod tests {
    use super::write_conlleval;
    use crate::test_helpers::{analysis, john_lives_here};

    #[test]
    fn conlleval_lines() {
        let (sentence, _) = john_lives_here();
        let gold = analysis(&["S-PER", "O", "O"], &[2, 0, 2]);
        let predicted = analysis(&["O", "B-LOC", "E-LOC"], &[2, 0, 2]);

        let mut output = Vec::new();
        write_conlleval(&mut output, &sentence, predicted.labels(), gold.labels()).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "John NNP B-PER O\nlives VBZ O B-LOC\nhere RB O I-LOC\n\n"
        );
    }
}
