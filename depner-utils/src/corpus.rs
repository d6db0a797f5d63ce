use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use failure::{Fail, ResultExt};

use depner::{
    Analysis, DependencyTree, Labels, Sentence, Tag, TagError, Token, DEFAULT_RELATION,
};

use crate::config::Parser;
use crate::progress::FileProgress;
use crate::Result;

/// The number of tab-separated columns of a token line.
const N_COLUMNS: usize = 11;

const FORM_COLUMN: usize = 1;
const POS_COLUMN: usize = 4;
const HEAD_COLUMN: usize = 6;
const RELATION_COLUMN: usize = 7;
const NER_COLUMN: usize = 10;

const EMPTY_FIELD: &str = "_";

#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum CorpusError {
    #[fail(display = "line {}: invalid head: {}", line, value)]
    InvalidHead { line: usize, value: String },

    #[fail(display = "line {}: {}", line, error)]
    InvalidTag { line: usize, error: TagError },
}

/// Reader for the tab-separated corpus format.
///
/// Each token is on a line with eleven columns, of which the form (2),
/// part-of-speech tag (5), head (7), dependency relation (8), and named
/// entity tag (11) are used. A line with fewer columns ends a sentence.
pub struct Reader<R> {
    read: R,
    line: usize,
    iobes: bool,
    relations: bool,
}

impl<R> Reader<R>
where
    R: BufRead,
{
    pub fn new(read: R) -> Self {
        Reader {
            read,
            line: 0,
            iobes: false,
            relations: true,
        }
    }

    /// Re-encode the IOB tags of the corpus as IOBES tags.
    pub fn iobes(mut self, iobes: bool) -> Self {
        self.iobes = iobes;
        self
    }

    /// Keep the dependency relations of the corpus. Otherwise, all arcs
    /// get the default relation.
    pub fn relations(mut self, relations: bool) -> Self {
        self.relations = relations;
        self
    }

    /// Read the next sentence, returning `None` at the end of the input.
    pub fn read_sentence(&mut self) -> Result<Option<(Sentence, Analysis)>> {
        let mut tokens = Vec::new();
        let mut tags = Vec::new();
        let mut arcs = Vec::new();

        let mut line = String::new();
        loop {
            line.clear();
            if self.read.read_line(&mut line)? == 0 {
                break;
            }
            self.line += 1;

            let fields: Vec<_> = line.trim_end_matches(&['\n', '\r'][..]).split('\t').collect();
            if fields.len() < N_COLUMNS {
                if tokens.is_empty() {
                    continue;
                }

                break;
            }

            tokens.push(Token::new(fields[FORM_COLUMN], fields[POS_COLUMN]));
            tags.push(self.parse_tag(fields[NER_COLUMN])?);
            arcs.push((
                self.parse_head(fields[HEAD_COLUMN])?,
                fields[RELATION_COLUMN].to_owned(),
            ));
        }

        if tokens.is_empty() {
            return Ok(None);
        }

        let sentence = Sentence::new(tokens);

        let mut labels = Labels::new(tags);
        if self.iobes {
            labels.encode_iobes();
        }

        let mut tree = DependencyTree::new(sentence.len());
        for (dependent, (head, relation)) in arcs.into_iter().enumerate() {
            let head = match head {
                Some(head) => head,
                None => continue,
            };

            if relation == EMPTY_FIELD {
                tree.set_head(dependent + 1, head, DEFAULT_RELATION);
            } else {
                tree.set_head(dependent + 1, head, relation);
            }
        }

        if !self.relations {
            tree.strip_relations();
        }

        Ok(Some((sentence, Analysis::new(labels, tree))))
    }

    fn parse_head(&self, value: &str) -> Result<Option<usize>> {
        if value == EMPTY_FIELD {
            return Ok(None);
        }

        let head = value.parse().map_err(|_| CorpusError::InvalidHead {
            line: self.line,
            value: value.to_owned(),
        })?;

        Ok(Some(head))
    }

    fn parse_tag(&self, value: &str) -> Result<Tag> {
        let tag = value.parse().map_err(|error| CorpusError::InvalidTag {
            line: self.line,
            error,
        })?;

        Ok(tag)
    }
}

impl<R> Iterator for Reader<R>
where
    R: BufRead,
{
    type Item = Result<(Sentence, Analysis)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_sentence() {
            Ok(Some(sentence)) => Some(Ok(sentence)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

/// Writer for the tab-separated corpus format.
pub struct Writer<W> {
    write: W,
    decode_iobes: bool,
}

impl<W> Writer<W>
where
    W: Write,
{
    pub fn new(write: W) -> Self {
        Writer {
            write,
            decode_iobes: false,
        }
    }

    /// Rewrite IOBES tags to IOB tags before writing.
    pub fn decode_iobes(mut self, decode_iobes: bool) -> Self {
        self.decode_iobes = decode_iobes;
        self
    }

    pub fn write_sentence(&mut self, sentence: &Sentence, analysis: &Analysis) -> io::Result<()> {
        let labels = if self.decode_iobes {
            analysis.labels().to_iob()
        } else {
            analysis.labels().clone()
        };
        let tree = analysis.tree();

        for token in 1..sentence.len() {
            let tag = labels
                .get(token)
                .cloned()
                .unwrap_or_else(Tag::outside);
            let head = tree
                .head(token)
                .map(|head| head.to_string())
                .unwrap_or_else(|| EMPTY_FIELD.to_owned());

            writeln!(
                self.write,
                "{}\t{}\t_\t{}\t{}\t_\t{}\t{}\t_\t_\t{}",
                token,
                sentence[token].form(),
                sentence[token].pos(),
                sentence[token].pos(),
                head,
                tree.relation(token).unwrap_or(EMPTY_FIELD),
                tag
            )?;
        }

        writeln!(self.write)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.write.flush()
    }
}

/// Read a corpus file, showing the progress on standard error.
pub fn read_corpus<P>(path: P, config: &Parser) -> Result<Vec<(Sentence, Analysis)>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|_| format!("Cannot open corpus: {}", path.to_string_lossy()))?;
    let reader = Reader::new(BufReader::new(FileProgress::new(file)?))
        .iobes(config.iobes)
        .relations(config.relations);

    let sentences = reader
        .collect::<Result<Vec<_>>>()
        .with_context(|_| format!("Cannot read corpus: {}", path.to_string_lossy()))?;

    Ok(sentences)
}
