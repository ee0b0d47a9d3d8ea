use gobuilder_lib::Result;
use gobuilder_lib::naming::{archive_path, search_dir};

pub struct ArchivePathArgs {
    pub target: String,
    pub import_path: String,
    pub search_dir: bool,
}

/// The line `archive-path` prints.
pub fn render(args: &ArchivePathArgs) -> Result<String> {
    let archive = archive_path(&args.target, &args.import_path)?;
    let path = if args.search_dir {
        search_dir(&archive)
    } else {
        archive.as_path()
    };
    Ok(path.display().to_string())
}

pub fn run(args: ArchivePathArgs) -> Result<()> {
    println!("{}", render(&args)?);
    Ok(())
}
