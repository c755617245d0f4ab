use clap::{crate_description, crate_name, crate_version, App, AppSettings, Arg, SubCommand};
use flashfs::{create, extract, list, verify};

fn main() -> anyhow::Result<()> {
    let arg_image = Arg::with_name("image")
        .help("Image file")
        .required(true)
        .value_name("IMAGE");

    let matches = App::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("create")
                .about("Create an image from a directory")
                .arg(
                    Arg::with_name("dir")
                        .help("Source directory")
                        .required(true)
                        .value_name("DIR"),
                )
                .arg(&arg_image),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("List image contents")
                .arg(&arg_image),
        )
        .subcommand(
            SubCommand::with_name("verify")
                .about("Verify image checksums")
                .arg(&arg_image),
        )
        .subcommand(
            SubCommand::with_name("extract")
                .about("Extract an image into a directory")
                .arg(&arg_image)
                .arg(
                    Arg::with_name("dir")
                        .help("Destination directory (defaults to '.')")
                        .required(true)
                        .value_name("DIR")
                        .default_value("."),
                ),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("create") {
        create(
            matches.value_of("dir").unwrap(),
            matches.value_of("image").unwrap(),
        )?;
    } else if let Some(matches) = matches.subcommand_matches("list") {
        list(matches.value_of("image").unwrap())?;
    } else if let Some(matches) = matches.subcommand_matches("verify") {
        verify(matches.value_of("image").unwrap())?;
    } else if let Some(matches) = matches.subcommand_matches("extract") {
        extract(
            matches.value_of("image").unwrap(),
            matches.value_of("dir").unwrap(),
        )?;
    }

    Ok(())
}
