// Command-line driver: train and evaluate n-gram models, generate and reorder
// sentences, and train and evaluate part-of-speech taggers.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kdam::tqdm;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::io::Write;

use rusty_ngram::config::{SmoothingKind, TrainConfig};
use rusty_ngram::data_reader::{read_sents, read_tagged_sents};
use rusty_ngram::evaluator::Evaluator;
use rusty_ngram::generator::NGramGenerator;
use rusty_ngram::io::{Load, Save};
use rusty_ngram::lms::LM;
use rusty_ngram::ngram::NGramModel;
use rusty_ngram::sorter::{edit_distance, SentSorter};
use rusty_ngram::tagging::evaluation::evaluate;
use rusty_ngram::tagging::stats::PosStats;
use rusty_ngram::tagging::viterbi::MlTagger;
use rusty_ngram::tagging::{BaselineTagger, MlHmm};
use rusty_ngram::NgramError;

#[derive(Parser, Debug)]
#[command(author = "lambdaviking", version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train an n-gram language model.
    Train(TrainArgs),
    /// Log-probability, cross-entropy and perplexity of saved models on a test set.
    Eval(EvalArgs),
    /// Sample sentences from a saved model.
    Generate(GenerateArgs),
    /// Recover the word order of shuffled test sentences.
    Sort(SortArgs),
    /// Train a part-of-speech tagger.
    TrainTagger(TrainTaggerArgs),
    /// Tagging accuracy of a saved tagger.
    EvalTagger(EvalTaggerArgs),
    /// Statistics of a tagged corpus.
    TagStats(TagStatsArgs),
}

#[derive(clap::Args, Debug)]
struct TrainArgs {
    #[arg(long)]
    train_path: String,
    #[arg(long)]
    save_path: String,
    /// JSON file with a full training configuration. Flags override it.
    #[arg(long)]
    config: Option<String>,
    #[arg(long, short = 'n')]
    order: Option<usize>,
    #[arg(long, short = 'm', value_enum)]
    smoothing: Option<SmoothingKind>,
    #[arg(long, short = 'g')]
    gamma: Option<f64>,
    #[arg(long, short = 'b')]
    beta: Option<f64>,
    #[arg(long)]
    train_fraction: Option<f64>,
    #[arg(long, default_value_t = false)]
    no_addone: bool,
}

#[derive(clap::Args, Debug)]
struct EvalArgs {
    #[arg(long, short = 'i', required = true)]
    model_path: Vec<String>,
    #[arg(long)]
    test_path: String,
    #[arg(long)]
    results_path: Option<String>,
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    #[arg(long, short = 'i')]
    model_path: String,
    #[arg(long, short = 'n', default_value_t = 10)]
    n_sents: usize,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    gen_path: Option<String>,
}

#[derive(clap::Args, Debug)]
struct SortArgs {
    #[arg(long, short = 'i')]
    model_path: String,
    #[arg(long)]
    test_path: String,
    /// Longer sentences are skipped; the search is exponential in length.
    #[arg(long, default_value_t = 10)]
    max_length: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TaggerKind {
    Base,
    Hmm,
}

#[derive(clap::Args, Debug)]
struct TrainTaggerArgs {
    #[arg(long)]
    train_path: String,
    #[arg(long)]
    save_path: String,
    #[arg(long, short = 'm', value_enum, default_value = "hmm")]
    model: TaggerKind,
    #[arg(long, short = 'n', default_value_t = 2)]
    order: usize,
    #[arg(long, default_value_t = false)]
    no_addone: bool,
}

#[derive(clap::Args, Debug)]
struct EvalTaggerArgs {
    #[arg(long, short = 'i')]
    model_path: String,
    #[arg(long, short = 'm', value_enum, default_value = "hmm")]
    model: TaggerKind,
    #[arg(long)]
    test_path: String,
    #[arg(long)]
    results_path: Option<String>,
    /// Print the confusion matrix of the most frequent tags.
    #[arg(long, short = 'c', default_value_t = false)]
    confusion: bool,
}

#[derive(clap::Args, Debug)]
struct TagStatsArgs {
    #[arg(long)]
    path: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Train(args) => train(args),
        Command::Eval(args) => eval(args),
        Command::Generate(args) => generate(args),
        Command::Sort(args) => sort(args),
        Command::TrainTagger(args) => train_tagger(args),
        Command::EvalTagger(args) => eval_tagger(args),
        Command::TagStats(args) => tag_stats(args),
    }
}

fn train(args: TrainArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => TrainConfig::from_json_file(path)?,
        None => TrainConfig::default(),
    };
    if let Some(order) = args.order {
        config.order = order;
    }
    if let Some(smoothing) = args.smoothing {
        config.smoothing = smoothing;
    }
    if let Some(gamma) = args.gamma {
        config.gamma = Some(gamma);
    }
    if let Some(beta) = args.beta {
        config.beta = Some(beta);
    }
    if let Some(train_fraction) = args.train_fraction {
        config.train_fraction = train_fraction;
    }
    if args.no_addone {
        config.addone = false;
    }

    let sents = read_sents(&args.train_path)?;
    println!("#(train): {}", sents.len());
    println!("Training {}-gram model ({:?})...", config.order, config.smoothing);
    let (model, search) = NGramModel::train_with_search(&sents, &config)?;
    if let Some(search) = search {
        println!("Grid search:");
        for (value, ppl) in search.scores.iter() {
            println!("  {:.3}\tppl={:.3}", value, ppl);
        }
        println!("  Best: {:.3} (ppl={:.3})", search.best, search.best_perplexity);
    }
    println!("Completed {}! (#ngrams={})", model.get_name(), model.counts().len());

    println!("Saving model...");
    model.save(&args.save_path)?;
    println!("Successfully saved model to {}!", &args.save_path);
    Ok(())
}

fn eval(args: EvalArgs) -> Result<()> {
    let test = read_sents(&args.test_path)?;
    println!("#(test): {}", test.len());

    let mut models = Vec::with_capacity(args.model_path.len());
    for path in args.model_path.iter() {
        models.push(NGramModel::load(path)?);
    }
    let mut evaluator = Evaluator::new(&test);
    for model in tqdm!(models.iter()) {
        evaluator.evaluate(model);
    }

    let names = evaluator.names();
    let log_probs = evaluator.get("log_prob");
    let cross_entropies = evaluator.get("cross_entropy");
    let perplexities = evaluator.get("perplexity");
    for i in 0..names.len() {
        println!("{}", names[i]);
        println!("  Log probability: {}", log_probs[i]);
        println!("  Cross entropy: {}", cross_entropies[i]);
        println!("  Perplexity: {}", perplexities[i]);
    }
    if let Some(results_path) = &args.results_path {
        evaluator.to_json(results_path)?;
        println!("Wrote results to {}", results_path);
    }
    Ok(())
}

fn generate(args: GenerateArgs) -> Result<()> {
    let model = NGramModel::load(&args.model_path)?;
    let generator = NGramGenerator::new(&model);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut lines = Vec::with_capacity(args.n_sents);
    for _ in tqdm!(0..args.n_sents) {
        let sent = generator.generate_sent(&mut rng)?;
        lines.push(sent.join(" "));
    }
    match &args.gen_path {
        Some(path) => {
            let mut file = fs::File::create(path)?;
            for line in lines.iter() {
                writeln!(file, "{}", line)?;
            }
            println!("Wrote {} sentences to {}", lines.len(), path);
        }
        None => {
            for line in lines.iter() {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn sort(args: SortArgs) -> Result<()> {
    let model = NGramModel::load(&args.model_path)?;
    let sorter = SentSorter::new(&model);
    let test = read_sents(&args.test_path)?;
    let test: Vec<Vec<String>> = test
        .into_iter()
        .filter(|sent| sent.len() <= args.max_length)
        .collect();
    println!("#(test): {} (max length {})", test.len(), args.max_length);

    let mut hits = 0;
    let mut failures = 0;
    let mut total_distance = 0;
    for sent in tqdm!(test.iter()) {
        let mut bag = sent.clone();
        bag.sort();
        match sorter.sort_probable_sent(&bag) {
            Ok(sorted) => {
                hits += (sorted == *sent) as usize;
                total_distance += edit_distance(&sorted, sent);
            }
            // Unsorted input is the fallback answer.
            Err(NgramError::NoViablePath) => {
                failures += 1;
                total_distance += edit_distance(&bag, sent);
            }
            Err(err) => return Err(err.into()),
        }
    }
    if test.is_empty() {
        eprintln!("Warning: no test sentences within the length limit");
        return Ok(());
    }
    println!(
        "Exact order recovered: {}/{} ({:.2}%)",
        hits,
        test.len(),
        (hits as f64) * 100. / (test.len() as f64)
    );
    println!(
        "Average edit distance: {:.3}",
        (total_distance as f64) / (test.len() as f64)
    );
    println!("  No viable ordering: {}", failures);
    Ok(())
}

fn train_tagger(args: TrainTaggerArgs) -> Result<()> {
    let sents = read_tagged_sents(&args.train_path)?;
    println!("#(train): {}", sents.len());
    match args.model {
        TaggerKind::Base => {
            println!("Training baseline tagger...");
            let tagger = BaselineTagger::new(&sents);
            tagger.save(&args.save_path)?;
        }
        TaggerKind::Hmm => {
            println!("Training {}-gram HMM...", args.order);
            let hmm = MlHmm::new(args.order, &sents, !args.no_addone)?;
            hmm.save(&args.save_path)?;
        }
    }
    println!("Successfully saved tagger to {}!", &args.save_path);
    Ok(())
}

fn eval_tagger(args: EvalTaggerArgs) -> Result<()> {
    let sents = read_tagged_sents(&args.test_path)?;
    println!("#(test): {}", sents.len());
    let report = match args.model {
        TaggerKind::Base => {
            let tagger = BaselineTagger::load(&args.model_path)?;
            evaluate(&tagger, tqdm!(sents.iter()))?
        }
        TaggerKind::Hmm => {
            let hmm = MlHmm::load(&args.model_path)?;
            evaluate(&MlTagger::new(&hmm), tqdm!(sents.iter()))?
        }
    };

    let percent = |acc: Option<f64>| acc.map(|x| x * 100.).unwrap_or(0.);
    println!("Accuracy: {:2.2}%", percent(report.accuracy()));
    if report.known_total > 0 {
        println!("Accuracy for known words: {:2.2}%", percent(report.known_accuracy()));
    }
    if report.unknown_total > 0 {
        println!("Accuracy for unknown words: {:2.2}%", percent(report.unknown_accuracy()));
    }
    if report.failures > 0 {
        eprintln!("Warning: {} sentences had no viable tagging", report.failures);
    }

    if args.confusion {
        let tags = report.top_tags(10);
        print!("g \\ p");
        for tag in tags.iter() {
            print!("\t{}", tag);
        }
        println!();
        for gold in tags.iter() {
            print!("{}", gold);
            for predicted in tags.iter() {
                print!("\t{:2.2}", report.confusion_rate(gold, predicted) * 100.);
            }
            println!();
        }
    }
    if let Some(results_path) = &args.results_path {
        report.to_json(results_path)?;
        println!("Wrote results to {}", results_path);
    }
    Ok(())
}

fn tag_stats(args: TagStatsArgs) -> Result<()> {
    let sents = read_tagged_sents(&args.path)?;
    if sents.is_empty() {
        bail!("no tagged sentences in {}", args.path);
    }
    let stats = PosStats::new(&sents);

    println!("Basic Statistics");
    println!("================");
    println!("sents: {}", stats.sent_count());
    println!("tokens: {}", stats.token_count());
    println!("words: {}", stats.word_count());
    println!("tags: {}", stats.tag_count());
    println!();

    println!("Most Frequent POS Tags");
    println!("======================");
    println!("tag\tfreq\t%\ttop");
    let token_count = stats.token_count() as f64;
    for (tag, freq) in stats.most_frequent_tags(10) {
        let top: Vec<&str> = stats.top_words(tag, 5).into_iter().map(|(w, _)| w).collect();
        println!(
            "{}\t{}\t{:2.2}\t({})",
            tag,
            freq,
            (freq as f64) * 100. / token_count,
            top.join(", ")
        );
    }
    println!();

    println!("Word Ambiguity Levels");
    println!("=====================");
    println!("n\twords\t%\ttop");
    let word_count = stats.word_count() as f64;
    for n in 1..10 {
        let words = stats.ambiguous_words(n);
        let top: Vec<&str> = words.iter().take(5).copied().collect();
        println!(
            "{}\t{}\t{:2.2}\t({})",
            n,
            words.len(),
            (words.len() as f64) * 100. / word_count,
            top.join(", ")
        );
    }
    Ok(())
}
