use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use depner::eval::Evaluation;
use depner::system::TransitionSystem;
use depner::systems::{JointSystem, LabelingSystem};
use depner::{Alphabet, TagScheme};

use crate::config::Parser;
use crate::Result;

pub trait CborRead
where
    Self: Sized,
{
    fn from_cbor_read<R>(read: R) -> Result<Self>
    where
        R: Read;
}

impl<T> CborRead for T
where
    T: DeserializeOwned,
{
    fn from_cbor_read<R>(read: R) -> Result<Self>
    where
        R: Read,
    {
        let data = serde_cbor::from_reader(read)?;
        Ok(data)
    }
}

pub trait CborWrite {
    fn to_cbor_write<W>(&self, write: &mut W) -> Result<()>
    where
        W: Write;
}

impl<T> CborWrite for T
where
    T: Serialize,
{
    fn to_cbor_write<W>(&self, write: &mut W) -> Result<()>
    where
        W: Write,
    {
        serde_cbor::to_writer(write, self)?;
        Ok(())
    }
}

/// Transition systems that can be constructed from the parser
/// configuration and stored with a model.
pub trait SerializableTransitionSystem:
    TransitionSystem + Clone + Serialize + DeserializeOwned
{
    fn from_config(config: &Parser, alphabet: &Alphabet) -> Self;

    /// The development score that model selection maximizes.
    fn dev_score(evaluation: &Evaluation) -> f64;
}

fn tag_scheme(config: &Parser) -> TagScheme {
    if config.iobes {
        TagScheme::Iobes
    } else {
        TagScheme::Iob
    }
}

impl SerializableTransitionSystem for JointSystem {
    fn from_config(config: &Parser, alphabet: &Alphabet) -> Self {
        JointSystem::new(alphabet, tag_scheme(config), config.single_root)
    }

    fn dev_score(evaluation: &Evaluation) -> f64 {
        evaluation.unit_attachment.f1()
    }
}

impl SerializableTransitionSystem for LabelingSystem {
    fn from_config(config: &Parser, alphabet: &Alphabet) -> Self {
        LabelingSystem::new(alphabet, tag_scheme(config))
    }

    fn dev_score(evaluation: &Evaluation) -> f64 {
        evaluation.labels.token_accuracy()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use depner::eval::Evaluation;
    use depner::features::DefaultTemplates;
    use depner::models::PerceptronModel;
    use depner::systems::{JointSystem, LabelingSystem};
    use depner::system::TransitionSystem;
    use depner::{Alphabet, Analysis, DependencyTree, TagScheme};

    use super::{CborRead, CborWrite, SerializableTransitionSystem};
    use crate::config::Parser;
    use crate::corpus::tests::SAMPLE;

    #[test]
    fn model_round_trip() {
        let alphabet = Alphabet::from_analyses(SAMPLE.iter().map(|(_, gold)| gold));
        let config = Parser {
            system: "joint".to_owned(),
            iobes: true,
            single_root: true,
            relations: false,
        };

        let system = JointSystem::from_config(&config, &alphabet);
        assert_eq!(system.tag_scheme(), TagScheme::Iobes);

        let mut model = PerceptronModel::new(system, DefaultTemplates);
        model.finalize();

        let mut data = Vec::new();
        model.to_cbor_write(&mut data).unwrap();
        let restored: PerceptronModel<JointSystem, DefaultTemplates> =
            PerceptronModel::from_cbor_read(&data[..]).unwrap();
        assert_eq!(restored, model);
    }

    #[test]
    fn dev_scores() {
        let (sentence, gold) = &SAMPLE[0];
        let unattached = Analysis::new(gold.labels().clone(), DependencyTree::new(sentence.len()));

        let mut evaluation = Evaluation::new();
        evaluation.add(sentence, &unattached, gold);

        assert_relative_eq!(LabelingSystem::dev_score(&evaluation), 100.0);
        assert!(JointSystem::dev_score(&evaluation) < 100.0);
        assert_relative_eq!(
            JointSystem::dev_score(&evaluation),
            evaluation.unit_attachment.f1()
        );
    }
}
