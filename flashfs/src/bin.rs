use std::fs;
use std::path::Path;

use crate::core::ImageSrc;
use crate::{check_name, Error, ImageBuilder, ImageFile};

/// Pack the regular files in `dir` into a new image at `image_path`. The
/// output file is only opened once every entry has been read and validated,
/// so a bad input leaves no output behind.
pub fn create(dir: impl AsRef<Path>, image_path: impl AsRef<Path>) -> Result<(), Error> {
    let image_path = image_path.as_ref();

    let mut builder = ImageBuilder::new();
    builder.dir(dir)?;

    let mut image_file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(image_path)
        .map_err(|e| Error::Io {
            reason: "Write image".to_string(),
            file: image_path.to_path_buf(),
            source: e,
        })?;

    builder.write_image(&mut image_file)?;

    Ok(())
}

/// Print the name of every entry in the image.
pub fn list(image_path: impl AsRef<Path>) -> Result<(), Error> {
    let mut image = ImageFile::open(image_path)?;
    for entry in image.entries()? {
        println!("{}", String::from_utf8_lossy(entry.name_bytes()));
    }
    Ok(())
}

/// Check the header checksum and every entry's payload checksum.
pub fn verify(image_path: impl AsRef<Path>) -> Result<(), Error> {
    let mut image = ImageFile::open(image_path)?;

    let entries = image.entries()?;
    for entry in &entries {
        image.load_entry(entry)?;
    }

    println!("{}: ok, {} files", image.path().display(), entries.len());
    Ok(())
}

/// Write every entry's unpadded contents into `dest`.
pub fn extract(image_path: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<(), Error> {
    let dest = dest.as_ref();
    if !dest.is_dir() {
        return Err(Error::NotADirectory(dest.to_path_buf()));
    }

    let mut image = ImageFile::open(image_path)?;
    for entry in image.entries()? {
        let data = image.load_entry(&entry)?;

        let name = check_name(entry.name_bytes())?;
        let path = dest.join(name);
        fs::write(&path, data).map_err(|e| Error::Io {
            reason: "Write extracted file".to_string(),
            file: path.clone(),
            source: e,
        })?;
    }
    Ok(())
}
