use astraqsim::algorithms::{bernstein_vazirani, deutsch_jozsa, oracles, qft, simon};
use astraqsim::circuit::Circuit;
use astraqsim::config::SimConfig;
use astraqsim::core::measure::sample_counts;
use astraqsim::core::{AmplitudeRegister, Simulator};
use astraqsim::gf2;
use astraqsim::Result;
use rand::rngs::StdRng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "astraqsim=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = SimConfig::from_env();
    print_banner();

    let outcome = match args.get(1).map(String::as_str) {
        None | Some("demo")           => run_all_demos(&config),
        Some("bell")                  => demo_bell_state(&config),
        Some("bv")                    => cli_bernstein_vazirani(&config, args.get(2).map(String::as_str)),
        Some("simon")                 => cli_simon(&config, args.get(2).map(String::as_str)),
        Some("dj")                    => cli_deutsch_jozsa(&config, args.get(2).map(String::as_str)),
        Some("add")                   => cli_add(&config, &args[2..]),
        Some("help") | Some("--help") => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown command '{}'. Run 'astraqsim help' for usage.", unknown);
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_banner() {
    println!("╔══════════════════════════════════════════════╗");
    println!("║          astraqsim v0.1.0                    ║");
    println!("║    Amplitude-Vector Quantum Simulator        ║");
    println!("╚══════════════════════════════════════════════╝");
    println!();
}

fn print_help() {
    println!("Usage: astraqsim [COMMAND] [ARGS]\n");
    println!("Commands:");
    println!("  demo                 Run built-in demonstration circuits");
    println!("  bell                 Prepare and sample a Bell pair");
    println!("  bv <bits>            Bernstein-Vazirani on secret <bits> (e.g. 1011)");
    println!("  simon <bits>         Simon's algorithm on nonzero period <bits>");
    println!("  dj <n>               Deutsch-Jozsa on constant and balanced n-bit oracles");
    println!("  add <a> <b> <width>  Draper QFT adder: a + b mod 2^width");
    println!("  help                 Show this message\n");
    println!("Environment:");
    println!("  ASTRAQSIM_SEED       Fixed RNG seed for reproducible runs");
    println!("  ASTRAQSIM_TOLERANCE  Normalization tolerance");
    println!("  RUST_LOG             Log filter (default astraqsim=info)");
}

// ── CLI ───────────────────────────────────────────────────────────────────

fn usage(text: &str) -> ! {
    eprintln!("Usage: astraqsim {text}");
    std::process::exit(1);
}

/// Parse a string like "1011" into bits, qubit 0 first.
fn parse_bits(raw: &str) -> Option<Vec<u8>> {
    if raw.is_empty() {
        return None;
    }
    raw.chars()
        .map(|c| match c {
            '0' => Some(0),
            '1' => Some(1),
            _ => None,
        })
        .collect()
}

fn bits_to_string(bits: &[u8]) -> String {
    bits.iter().map(|&b| if b == 1 { '1' } else { '0' }).collect()
}

fn cli_bernstein_vazirani(config: &SimConfig, arg: Option<&str>) -> Result<()> {
    let secret = match arg.and_then(parse_bits) {
        Some(s) => s,
        None => usage("bv <bits>"),
    };
    println!("━━━ Bernstein-Vazirani ━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let recovered = bernstein_vazirani::run(&secret, &mut config.rng())?;
    println!("  secret    : {}", bits_to_string(&secret));
    println!("  recovered : {}  (1 query)", bits_to_string(&recovered));
    Ok(())
}

fn cli_simon(config: &SimConfig, arg: Option<&str>) -> Result<()> {
    let secret = match arg.and_then(parse_bits) {
        Some(s) => s,
        None => usage("simon <bits>"),
    };
    println!("━━━ Simon's Algorithm ━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let recovered = simon::run(&secret, &mut config.rng(), config.simon_max_attempts)?;
    println!("  period    : {}", bits_to_string(&secret));
    println!("  recovered : {}", bits_to_string(&recovered));
    Ok(())
}

fn cli_deutsch_jozsa(config: &SimConfig, arg: Option<&str>) -> Result<()> {
    let n: usize = match arg.and_then(|a| a.parse().ok()) {
        Some(n) if n > 0 => n,
        _ => usage("dj <n>"),
    };
    println!("━━━ Deutsch-Jozsa ({n} input bits) ━━━━━━━━━━━━━━━━━");
    let mut rng = config.rng();
    for value in [0, 1] {
        let oracle = oracles::deutsch_jozsa_constant(n, value)?;
        let verdict = deutsch_jozsa::run(&oracle, n, &mut rng)?;
        println!("  f(x) = {value}       → {verdict}");
    }
    let mask = vec![1u8; n];
    let oracle = oracles::deutsch_jozsa_balanced(n, &mask)?;
    let verdict = deutsch_jozsa::run(&oracle, n, &mut rng)?;
    println!("  f(x) = ⊕ xᵢ    → {verdict}");
    Ok(())
}

fn cli_add(config: &SimConfig, args: &[String]) -> Result<()> {
    let parsed: Option<Vec<u64>> = args.iter().take(3).map(|a| a.parse().ok()).collect();
    let (a, b, width) = match parsed.as_deref() {
        Some(&[a, b, width]) => (a, b, width as usize),
        _ => usage("add <a> <b> <width>"),
    };
    println!("━━━ Draper QFT Adder ━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let sum = qft::add(a, b, width, &mut config.rng())?;
    println!("  {a} + {b} mod 2^{width} = {sum}");
    Ok(())
}

// ── Demos ─────────────────────────────────────────────────────────────────

fn run_all_demos(config: &SimConfig) -> Result<()> {
    demo_single_qubit(config)?;
    demo_bell_state(config)?;
    demo_ghz_state(config)?;
    demo_teleportation(config)?;
    demo_deutsch_jozsa(config)?;
    demo_bernstein_vazirani(config)?;
    demo_simon(config)?;
    demo_adder(config)?;
    Ok(())
}

fn demo_single_qubit(config: &SimConfig) -> Result<()> {
    println!("━━━ Demo 1: Single Qubit Basics ━━━━━━━━━━━━━━━━━");
    let mut sim = Simulator::with_config(1, config.clone())?;
    println!("Initial |0⟩:");
    sim.print_state();
    sim.h(0)?;
    println!("After H (superposition):");
    sim.print_state();
    sim.z(0)?.h(0)?;
    println!("After H·Z·H = X (should be |1⟩):");
    sim.print_state();
    println!();
    Ok(())
}

fn demo_bell_state(config: &SimConfig) -> Result<()> {
    println!("━━━ Demo 2: Bell State |Φ+⟩ ━━━━━━━━━━━━━━━━━━━━━");
    let mut circuit = Circuit::new(2);
    circuit.h(0)?.cx(0, 1)?;
    print!("{circuit}");

    let mut reg = AmplitudeRegister::new(2)?;
    let mut rng = config.rng();
    circuit.execute(&mut reg, &mut rng)?;
    print!("{reg}");

    let counts = sample_counts(&reg, 1000, &mut rng);
    let count = |i: usize| counts.get(&i).copied().unwrap_or(0);
    println!("Sampling 1000 shots:  |00⟩={} |11⟩={}", count(0), count(3));
    println!();
    Ok(())
}

fn demo_ghz_state(config: &SimConfig) -> Result<()> {
    println!("━━━ Demo 3: GHZ State (3 qubits) ━━━━━━━━━━━━━━━━");
    let mut sim = Simulator::with_config(3, config.clone())?;
    sim.h(0)?.cnot(0, 1)?.cnot(0, 2)?;
    sim.print_state();

    let (mut c000, mut c111, mut other) = (0u32, 0u32, 0u32);
    let mut rng = config.rng();
    for (index, n) in sample_counts(sim.register(), 1000, &mut rng) {
        match index {
            0b000 => c000 += n as u32,
            0b111 => c111 += n as u32,
            _ => other += n as u32,
        }
    }
    println!("Sampling 1000 shots:  |000⟩={c000}  |111⟩={c111}  other={other}");
    println!();
    Ok(())
}

fn demo_teleportation(config: &SimConfig) -> Result<()> {
    println!("━━━ Demo 4: Quantum Teleportation ━━━━━━━━━━━━━━━");
    println!("Teleporting Ry(60°)|0⟩ from q0 to q2.  [msg|alice|bob]");
    let mut sim = Simulator::with_config(3, config.clone())?;
    sim.ry(0, 60.0)?;
    sim.h(1)?.cnot(1, 2)?;
    sim.cnot(0, 1)?.h(0)?;
    let m0 = sim.measure(0)?;
    let m1 = sim.measure(1)?;
    if m1 == 1 {
        sim.x(2)?;
    }
    if m0 == 1 {
        sim.z(2)?;
    }
    let p1 = sim.qubit_probability_one(2)?;
    let expected = (30f64).to_radians().sin().powi(2);
    println!(
        "Bob P(|1⟩) = {p1:.4} (expect {expected:.4})  →  {}",
        if (p1 - expected).abs() < 1e-6 { "SUCCESS" } else { "FAILED" }
    );
    println!();
    Ok(())
}

fn demo_deutsch_jozsa(config: &SimConfig) -> Result<()> {
    println!("━━━ Demo 5: Deutsch-Jozsa ━━━━━━━━━━━━━━━━━━━━━━━");
    println!("One oracle query reveals constant vs balanced.\n");
    let mut rng = config.rng();
    let constant = oracles::deutsch_jozsa_constant(3, 1)?;
    let balanced = oracles::deutsch_jozsa_balanced(3, &[1, 0, 1])?;
    println!("  f(x)=1          : {} (expect constant)", deutsch_jozsa::run(&constant, 3, &mut rng)?);
    println!("  f(x)=x₀ ⊕ x₂    : {} (expect balanced)", deutsch_jozsa::run(&balanced, 3, &mut rng)?);
    println!();
    Ok(())
}

fn demo_bernstein_vazirani(config: &SimConfig) -> Result<()> {
    println!("━━━ Demo 6: Bernstein-Vazirani ━━━━━━━━━━━━━━━━━━");
    let secret = [1u8, 0, 1, 1];
    let circuit = bernstein_vazirani::circuit(&secret)?;
    print!("{circuit}");
    let recovered = bernstein_vazirani::run(&secret, &mut config.rng())?;
    println!("  secret {} → recovered {}", bits_to_string(&secret), bits_to_string(&recovered));
    println!();
    Ok(())
}

fn demo_simon(config: &SimConfig) -> Result<()> {
    println!("━━━ Demo 7: Simon's Algorithm ━━━━━━━━━━━━━━━━━━━");
    let secret = [1u8, 1, 0];
    let recovered = simon::run(&secret, &mut config.rng(), config.simon_max_attempts)?;
    println!("  period {} → recovered {}", bits_to_string(&secret), bits_to_string(&recovered));

    // The classical half on its own: two independent samples orthogonal to 110.
    let samples: Vec<Vec<u8>> = vec![vec![1, 1, 1], vec![0, 0, 1]];
    println!("  GF(2) solve of [111, 001] → {}", bits_to_string(&gf2::solve(&samples)?));
    println!();
    Ok(())
}

fn demo_adder(config: &SimConfig) -> Result<()> {
    println!("━━━ Demo 8: Draper QFT Adder ━━━━━━━━━━━━━━━━━━━━");
    let mut rng: StdRng = config.rng();
    for (a, b) in [(3, 4), (5, 6), (7, 7)] {
        let sum = qft::add(a, b, 4, &mut rng)?;
        println!("  {a} + {b} mod 16 = {sum}");
    }
    println!();
    Ok(())
}
