use std::env::args;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;

use colored::Colorize;
use depner::features::DefaultTemplates;
use depner::models::PerceptronModel;
use depner::systems::{JointSystem, LabelingSystem};
use depner::train::{collect_examples, EarlyUpdateTrainer};
use depner::{Alphabet, Analysis, Sentence, TreeStats};
use failure::ResultExt;
use getopts::Options;
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use depner_utils::{
    evaluate, read_corpus, stderr, BestScore, CborWrite, Config, OrExit, Result,
    SerializableTransitionSystem, TomlRead,
};

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} [options] CONFIG TRAIN_DATA [DEV_DATA]", program);
    print!("{}", opts.usage(&brief));
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help menu");
    let matches = opts.parse(&args[1..]).or_exit();

    if matches.opt_present("h") {
        print_usage(&program, opts);
        return;
    }

    if matches.free.len() < 2 || matches.free.len() > 3 {
        print_usage(&program, opts);
        process::exit(1);
    }

    let config_file = File::open(&matches.free[0]).or_exit();
    let mut config = Config::from_toml_read(config_file).or_exit();
    config.relativize_paths(&matches.free[0]).or_exit();

    stderr!("Reading training data...");
    let train_data = read_corpus(&matches.free[1], &config.parser).or_exit();
    print_tree_stats(&train_data);

    let dev_data = matches.free.get(2).map(|path| {
        stderr!("Reading development data...");
        read_corpus(path, &config.parser).or_exit()
    });

    train(&config, &train_data, dev_data.as_ref().map(Vec::as_slice)).or_exit();
}

fn print_tree_stats(corpus: &[(Sentence, Analysis)]) {
    let mut stats = TreeStats::default();
    stats.extend(corpus.iter().map(|(_, analysis)| analysis.tree()));
    stderr!("{}", stats);
}

fn train(
    config: &Config,
    train_data: &[(Sentence, Analysis)],
    dev_data: Option<&[(Sentence, Analysis)]>,
) -> Result<()> {
    match config.parser.system.as_ref() {
        "joint" => train_with_system::<JointSystem>(config, train_data, dev_data),
        "labeling" => train_with_system::<LabelingSystem>(config, train_data, dev_data),
        _ => {
            stderr!("Unsupported transition system: {}", config.parser.system);
            process::exit(1);
        }
    }
}

fn train_with_system<S>(
    config: &Config,
    train_data: &[(Sentence, Analysis)],
    dev_data: Option<&[(Sentence, Analysis)]>,
) -> Result<()>
where
    S: SerializableTransitionSystem,
{
    let alphabet = Alphabet::from_analyses(train_data.iter().map(|(_, analysis)| analysis));
    info!(
        "Alphabet: {} tags, {} relations",
        alphabet.tags().count(),
        alphabet.relations().count()
    );

    let system = S::from_config(&config.parser, &alphabet);
    let (examples, skipped) = collect_examples(&system, train_data);
    if skipped.total() != 0 {
        stderr!("{}", skipped);
    }
    stderr!("Training on {} sentences", examples.len());

    let mut trainer = EarlyUpdateTrainer::new(PerceptronModel::new(system, DefaultTemplates));
    let mut rng = ChaCha8Rng::seed_from_u64(config.train.seed);
    let mut best = BestScore::new();

    for epoch in 1..=config.train.iterations {
        trainer.train_epoch(&examples, config.train.shuffle, &mut rng)?;

        let dev_data = match dev_data {
            Some(dev_data) => dev_data,
            None => continue,
        };

        if config.train.eval_interval != 0 && epoch % config.train.eval_interval == 0 {
            trainer.average();
            let model = trainer.model();
            let evaluation = evaluate(model.system(), model, dev_data)?;
            stderr!("{}\n{}", "Development data".bold(), evaluation.to_string().yellow());

            if config.train.save_best && best.improves(epoch, S::dev_score(&evaluation)) {
                let mut model = model.clone();
                model.finalize();
                write_model(config, &model)?;
                stderr!("{}", format!("Saved model of epoch {}", epoch).green());
            }
        }
    }

    let model = trainer.into_model();
    info!("Features: {}", model.extractor().n_features());

    if let (true, Some(dev_data)) = (config.train.save_best, dev_data) {
        let evaluation = evaluate(model.system(), &model, dev_data)?;
        if !best.improves(config.train.iterations, S::dev_score(&evaluation)) {
            if let Some((epoch, score)) = best.best() {
                stderr!("Keeping model of epoch {} (score {:.2})", epoch, score);
            }
            return Ok(());
        }
    }

    write_model(config, &model)
}

fn write_model<S>(config: &Config, model: &PerceptronModel<S, DefaultTemplates>) -> Result<()>
where
    S: SerializableTransitionSystem,
{
    let mut f = BufWriter::new(
        File::create(&config.model.filename)
            .with_context(|_| format!("Cannot create model file: {}", config.model.filename))?,
    );
    model.to_cbor_write(&mut f)?;
    f.flush()?;

    if let Some(ref weights) = config.model.weights {
        let mut f = BufWriter::new(
            File::create(weights)
                .with_context(|_| format!("Cannot create weights file: {}", weights))?,
        );
        model.write_weights(&mut f)?;
        f.flush()?;
    }

    Ok(())
}
