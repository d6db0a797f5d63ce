use depner::eval::Evaluation;
use depner::parser::{GreedyParser, Parse};
use depner::system::TransitionSystem;
use depner::{Analysis, Guide, Sentence};

use crate::Result;

/// Parse the sentences of a corpus and evaluate the analyses against the
/// gold-standard analyses of the corpus.
pub fn evaluate<S, G>(system: &S, guide: &G, corpus: &[(Sentence, Analysis)]) -> Result<Evaluation>
where
    S: TransitionSystem,
    G: Guide,
{
    let parser = GreedyParser::new(system, guide);

    let mut evaluation = Evaluation::new();
    for (sentence, gold) in corpus {
        let predicted = parser.parse(sentence)?;
        evaluation.add(sentence, &predicted, gold);
    }

    Ok(evaluation)
}
