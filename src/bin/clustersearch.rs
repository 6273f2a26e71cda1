use anyhow::Result;
use clap::Parser;
use permclust::{ClusterSearch, ConditionFile, SearchConfig, Sign};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clustersearch", about = "Cluster-based permutation test for two epoch sets")]
struct Args {
    /// safetensors file holding the two condition tensors
    #[arg(long)]
    input: PathBuf,

    /// Tensor name of condition A
    #[arg(long, default_value = "cond_a")]
    cond_a: String,

    /// Tensor name of condition B
    #[arg(long, default_value = "cond_b")]
    cond_b: String,

    /// Number of label-shuffling surrogates
    #[arg(long, default_value_t = 1000)]
    surrogates: usize,

    /// Cluster-forming threshold on the pointwise t statistic
    #[arg(long, default_value_t = 2.0)]
    threshold: f64,

    /// Significance level for flagging clusters
    #[arg(long, default_value_t = permclust::DEFAULT_ALPHA)]
    alpha: f64,

    /// Seed for reproducible permutations (omit for an entropy seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Optional result.safetensors output for plotting layers
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let source = ConditionFile {
        path: args.input.clone(),
        names: [args.cond_a.clone(), args.cond_b.clone()],
    };
    let cfg = SearchConfig {
        num_surrogates: args.surrogates,
        threshold: args.threshold,
        seed: args.seed,
    };
    let engine = ClusterSearch::from_source(&source, cfg)?;
    println!(
        "Loaded {:?} / {:?} from {} (seed {})",
        args.cond_a,
        args.cond_b,
        args.input.display(),
        engine.seed()
    );

    let result = engine.search(args.alpha);
    println!(
        "{} surrogates, null max-mass range [{:.3}, {:.3}]",
        result.surrogates_run,
        result.null_min(),
        result
            .null_distribution
            .iter()
            .copied()
            .fold(0.0_f64, f64::max),
    );

    if result.clusters.is_empty() {
        println!("No suprathreshold clusters at threshold {}", args.threshold);
    } else {
        println!("  #  ch  samples        mass        p      ");
        for (i, c) in result.clusters.iter().enumerate() {
            let dir = match c.sign {
                Sign::Positive => '+',
                Sign::Negative => '-',
            };
            println!(
                "{:>3}  {:>2}  [{:>4}, {:>4})  {}{:>9.3}  {:.4}  {}",
                i,
                c.channel,
                c.start,
                c.end,
                dir,
                c.mass.abs(),
                result.p_values[i],
                if result.significant[i] { "*" } else { "" },
            );
        }
        println!(
            "{} of {} clusters significant at alpha = {}",
            result.significant_clusters().len(),
            result.clusters.len(),
            args.alpha
        );
    }

    if let Some(out) = &args.output {
        permclust::write_result(&result, out)?;
        println!("Written → {}", out.display());
    }

    Ok(())
}
