use std::env::args;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process;
use std::time::Instant;

use colored::Colorize;
use depner::eval::{write_conlleval, Evaluation};
use depner::features::DefaultTemplates;
use depner::models::PerceptronModel;
use depner::parser::{GreedyParser, Parse};
use depner::systems::{JointSystem, LabelingSystem};
use failure::ResultExt;
use getopts::Options;
use stdinout::{Input, Output};

use depner_utils::{
    stderr, CborRead, Config, OrExit, ParseStats, Reader, Result, SerializableTransitionSystem,
    TomlRead, Writer,
};

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} [options] CONFIG [INPUT] [OUTPUT]", program);
    print!("{}", opts.usage(&brief));
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt(
        "",
        "conlleval",
        "write tags in conlleval format to FILE",
        "FILE",
    );
    opts.optflag("h", "help", "print this help menu");
    let matches = opts.parse(&args[1..]).or_exit();

    if matches.opt_present("h") {
        print_usage(&program, opts);
        return;
    }

    if matches.free.is_empty() || matches.free.len() > 3 {
        print_usage(&program, opts);
        process::exit(1);
    }

    let config_file = File::open(&matches.free[0]).or_exit();
    let mut config = Config::from_toml_read(config_file).or_exit();
    config.relativize_paths(&matches.free[0]).or_exit();

    let input = Input::from(matches.free.get(1));
    let reader = Reader::new(input.buf_read().or_exit())
        .iobes(config.parser.iobes)
        .relations(config.parser.relations);

    let output = Output::from(matches.free.get(2));
    let writer = Writer::new(BufWriter::new(output.write().or_exit()))
        .decode_iobes(config.parser.iobes);

    let conlleval = matches
        .opt_str("conlleval")
        .map(|path| BufWriter::new(File::create(path).or_exit()));

    parse(&config, reader, writer, conlleval).or_exit();
}

fn parse<R, W, C>(
    config: &Config,
    reader: Reader<R>,
    writer: Writer<W>,
    conlleval: Option<C>,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    C: Write,
{
    match config.parser.system.as_ref() {
        "joint" => parse_with_system::<JointSystem, _, _, _>(config, reader, writer, conlleval),
        "labeling" => {
            parse_with_system::<LabelingSystem, _, _, _>(config, reader, writer, conlleval)
        }
        _ => {
            stderr!("Unsupported transition system: {}", config.parser.system);
            process::exit(1);
        }
    }
}

fn parse_with_system<S, R, W, C>(
    config: &Config,
    reader: Reader<R>,
    mut writer: Writer<W>,
    mut conlleval: Option<C>,
) -> Result<()>
where
    S: SerializableTransitionSystem,
    R: BufRead,
    W: Write,
    C: Write,
{
    let f = File::open(&config.model.filename)
        .with_context(|_| format!("Cannot open model file: {}", config.model.filename))?;
    let model: PerceptronModel<S, DefaultTemplates> =
        PerceptronModel::from_cbor_read(BufReader::new(f))?;
    let parser = GreedyParser::new(model.system(), &model);

    let mut evaluation = Evaluation::new();
    let mut stats = ParseStats::new();
    for sentence in reader {
        let (sentence, gold) = sentence?;

        let start = Instant::now();
        let predicted = parser.parse(&sentence)?;
        let elapsed = start.elapsed();

        let unknown_words = (1..sentence.len())
            .filter(|&token| !model.is_known_word(sentence[token].form()))
            .count();
        stats.add(sentence.len() - 1, unknown_words, elapsed);

        evaluation.add(&sentence, &predicted, &gold);
        writer.write_sentence(&sentence, &predicted)?;
        if let Some(ref mut conlleval) = conlleval {
            write_conlleval(conlleval, &sentence, predicted.labels(), gold.labels())?;
        }
    }

    writer.flush()?;
    if let Some(ref mut conlleval) = conlleval {
        conlleval.flush()?;
    }

    stderr!("{}", stats);
    stderr!("{}", evaluation.to_string().yellow());

    Ok(())
}
