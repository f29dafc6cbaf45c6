//! Builds the giant-step lookup table once and writes it as `lookupTableBBJub<size>.json`, the
//! artifact clients load before calling `decode`.

use {
    ark_ec::{AffineRepr, CurveGroup},
    ark_ed_on_bn254::Fq,
    babyjub_elgamal::{decode, precompute, BabyJubjubParameters, ElGamalError, LookupTable},
    clap::{
        crate_description, crate_name, crate_version, value_parser, Arg, ArgAction, ArgMatches,
        Command,
    },
    log::{error, info},
    std::{
        error::Error,
        fs::{self, File},
        io::{BufWriter, Write},
        path::{Path, PathBuf},
        process::exit,
        time::Instant,
    },
};

const DEFAULT_PRECOMPUTE_SIZE: &str = "19";

fn artifact_name(precompute_size: u8) -> String {
    format!("lookupTableBBJub{precompute_size}.json")
}

/// Values checked by `--verify`: both ends of the range and the boundaries between baby and giant
/// steps
fn sample_values(precompute_size: u8) -> Vec<u32> {
    let range = 32 - precompute_size as u32;
    let mut values = vec![0, 1, u32::MAX, 1_000_000, 0x9e37_79b9];
    if range < 32 {
        values.extend([(1u32 << range) - 1, 1 << range, (1 << range) + 1]);
    }
    values.sort_unstable();
    values.dedup();
    values
}

fn write_table(path: &Path, table: &LookupTable<Fq>) -> Result<(), Box<dyn Error>> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, table)?;
    writer.flush()?;
    Ok(())
}

fn verify(
    params: &BabyJubjubParameters,
    precompute_size: u8,
    table: &LookupTable<Fq>,
) -> Result<(), ElGamalError> {
    for m in sample_values(precompute_size) {
        let point = params.base().mul_bigint([m as u64]).into_affine();
        let decoded = decode(params, &point, precompute_size, table)?;
        if decoded != m {
            return Err(ElGamalError::DiscreteLogNotFound);
        }
        info!("Decoded {m}");
    }
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<PathBuf, Box<dyn Error>> {
    let precompute_size = *matches
        .get_one::<u8>("precompute_size")
        .ok_or("missing precompute size")?;
    let out_dir = matches
        .get_one::<PathBuf>("out_dir")
        .ok_or("missing output directory")?;
    let params = BabyJubjubParameters::default();

    info!("Building table with 2^{precompute_size} entries");
    let start = Instant::now();
    let table = precompute(&params, precompute_size)?;
    info!("Built {} entries in {:?}", table.len(), start.elapsed());

    if matches.get_flag("verify") {
        verify(&params, precompute_size, &table)?;
        info!("Table verified");
    }

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(artifact_name(precompute_size));
    write_table(&path, &table)?;
    Ok(path)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .arg(
            Arg::new("precompute_size")
                .short('s')
                .long("precompute-size")
                .value_name("BITS")
                .default_value(DEFAULT_PRECOMPUTE_SIZE)
                .value_parser(value_parser!(u8).range(0..=32))
                .help("Number of high bits resolved by the table, it gets 2^BITS entries"),
        )
        .arg(
            Arg::new("out_dir")
                .short('o')
                .long("out-dir")
                .value_name("DIR")
                .default_value(".")
                .value_parser(value_parser!(PathBuf))
                .help("Directory the table is written to"),
        )
        .arg(
            Arg::new("verify")
                .long("verify")
                .action(ArgAction::SetTrue)
                .help("Decode a few sample values with the fresh table before writing it"),
        )
        .get_matches();

    match run(&matches) {
        Ok(path) => info!("Wrote {}", path.display()),
        Err(err) => {
            error!("{err}");
            exit(1);
        }
    }
}
