//! Draws command - inspect raw generator output

use anyhow::{Result, bail};
use clap::Args;
use tdshop_core::Squirrel3;

/// Arguments for the draws command
#[derive(Args)]
pub struct DrawsArgs {
    /// Generator seed (random if omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i32>,

    /// Draws already made before the first printed one
    #[arg(long, default_value = "0")]
    pub draw_count: i32,

    /// How many draws to print
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,

    /// Map draws into [min, max) instead of [0, 1)
    #[arg(long, requires = "max", allow_negative_numbers = true)]
    pub min: Option<f32>,

    #[arg(long, requires = "min", allow_negative_numbers = true)]
    pub max: Option<f32>,
}

/// Execute the draws command
pub fn execute(args: DrawsArgs) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => Squirrel3::from_parts(seed, args.draw_count),
        None => {
            if args.draw_count != 0 {
                bail!("--draw-count needs an explicit --seed");
            }
            Squirrel3::new()
        }
    };

    println!("seed {} (draw count {})", rng.seed(), rng.draw_count());
    for line in draw_lines(&mut rng, args.count, args.min.zip(args.max)) {
        println!("{}", line);
    }
    println!("state {}", serde_json::to_string(&rng.state())?);
    Ok(())
}

fn draw_lines(rng: &mut Squirrel3, count: usize, range: Option<(f32, f32)>) -> Vec<String> {
    (0..count)
        .map(|_| {
            let value = match range {
                Some((min, max)) => rng.range_f32(min, max),
                None => rng.next_f32(),
            };
            format!("{:>6}  {}", rng.draw_count(), value)
        })
        .collect()
}
