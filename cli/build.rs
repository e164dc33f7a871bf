use std::io::Result;

#[cfg(feature = "man")]
include!("src/args.rs");

fn main() -> Result<()> {
    #[cfg(feature = "man")]
    genman()?;

    Ok(())
}

#[cfg(feature = "man")]
fn genman() -> Result<()> {
    let out_dir = std::path::PathBuf::from(
        std::env::var_os("OUT_DIR").ok_or(std::io::ErrorKind::NotFound)?,
    );

    let cmd = <Args as clap::CommandFactory>::command();

    let mut file = std::fs::File::create(out_dir.join(format!("{}.1", cmd.get_name())))?;

    clap_mangen::Man::new(cmd).render(&mut file)?;

    Ok(())
}
