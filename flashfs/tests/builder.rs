use std::fs;
use std::io::Cursor;
use std::path::Path;

use flashfs::{create, extract, list, verify, Error, ImageBuilder, ImageFile};
use flashfs_core::{header_checksum, negating_sum, Entry, Header, ImageSrc};
use flashfs_core::{Error as CoreError, ENTRY_SIZE, HEADER_SIZE, MAGIC, NAME_SIZE};

fn write_files(dir: &Path, files: &[(&str, &[u8])]) {
    for (name, contents) in files {
        fs::write(dir.join(name), contents).unwrap();
    }
}

#[test]
fn empty_directory_image() -> Result<(), Error> {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("src");
    fs::create_dir(&dir).unwrap();
    let image_path = tmp.path().join("empty.img");

    create(&dir, &image_path)?;

    let image = fs::read(&image_path).unwrap();
    assert_eq!(
        image,
        [0x5A, 0xA5, 0xDE, 0xC0, 0, 0, 0, 0, 0, 0, 0, 0],
        "empty image must be magic, zero checksum, zero count"
    );
    Ok(())
}

#[test]
fn single_file_golden_bytes() -> Result<(), Error> {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("src");
    fs::create_dir(&dir).unwrap();
    write_files(&dir, &[("a.txt", b"hello")]);
    let image_path = tmp.path().join("one.img");

    create(&dir, &image_path)?;

    let image = fs::read(&image_path).unwrap();
    assert_eq!(image.len(), 48);

    // Magic, header checksum, count
    assert_eq!(&image[0..4], &[0x5A, 0xA5, 0xDE, 0xC0]);
    assert_eq!(&image[4..8], &[0xD4, 0x36, 0xF8, 0xF3]);
    assert_eq!(&image[8..12], &[1, 0, 0, 0]);

    // Entry: name, size, checksum, offset
    assert_eq!(&image[12..28], b"a.txt\0\0\0\0\0\0\0\0\0\0\0");
    assert_eq!(&image[28..32], &5u32.to_le_bytes()[..]);
    assert_eq!(&image[32..36], &0x9393_9A29u32.to_le_bytes()[..]);
    assert_eq!(&image[36..40], &40u32.to_le_bytes()[..]);

    // Zero-padded payload
    assert_eq!(&image[40..48], b"hello\0\0\0");

    // The checksummed region extended with the checksum word sums to zero
    let mut region = image[8..40].to_vec();
    region.extend_from_slice(&image[4..8]);
    assert_eq!(negating_sum(&region)?, 0);

    Ok(())
}

#[test]
fn builder_writes_to_any_writer() -> Result<(), Error> {
    let mut dest = Cursor::new(Vec::new());

    let mut builder = ImageBuilder::new();
    builder.data(&b"hello"[..], "a.txt")?;
    let total = builder.write_image(&mut dest)?;

    let image = dest.into_inner();
    assert_eq!(total, image.len() as u64);
    assert_eq!(&image[HEADER_SIZE + ENTRY_SIZE..], b"hello\0\0\0");
    Ok(())
}

#[test]
fn sixteen_byte_name_allowed() -> Result<(), Error> {
    let mut builder = ImageBuilder::new();
    builder.data(&b"x"[..], "sixteen.bytes.go")?;

    let mut dest = Cursor::new(Vec::new());
    builder.write_image(&mut dest)?;

    let mut image = dest.into_inner();
    let entries = image.entries().map_err(Error::from)?;
    assert_eq!(entries[0].name_bytes(), b"sixteen.bytes.go");
    Ok(())
}

#[test]
fn seventeen_byte_name_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("src");
    fs::create_dir(&dir).unwrap();
    write_files(&dir, &[("seventeen.chars.x", b"data")]);
    let image_path = tmp.path().join("out.img");

    let result = create(&dir, &image_path);
    assert!(matches!(result, Err(Error::NameTooLong { len: 17, .. })));
    assert!(!image_path.exists(), "no output must be written");
}

#[test]
fn subdirectory_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("src");
    fs::create_dir(&dir).unwrap();
    write_files(&dir, &[("ok.txt", b"fine")]);
    fs::create_dir(dir.join("sub")).unwrap();
    let image_path = tmp.path().join("out.img");

    let result = create(&dir, &image_path);
    assert!(matches!(result, Err(Error::NotAFile(_))));
    assert!(!image_path.exists(), "no output must be written");
}

#[test]
fn source_must_be_a_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("plain");
    fs::write(&file, b"not a dir").unwrap();

    let result = create(&file, tmp.path().join("out.img"));
    assert!(matches!(result, Err(Error::NotADirectory(_))));
}

#[test]
fn entries_sorted_with_contiguous_offsets() -> Result<(), Error> {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("src");
    fs::create_dir(&dir).unwrap();
    write_files(
        &dir,
        &[
            ("b.txt", b"six ch"),
            ("a.txt", &[0xAA; 1023]),
            ("c.txt", b""),
            ("d.txt", b"1234"),
        ],
    );
    let image_path = tmp.path().join("out.img");

    create(&dir, &image_path)?;

    let mut image = ImageFile::open(&image_path)?;
    let entries = image.entries()?;

    let names: Vec<&[u8]> = entries.iter().map(|e| e.name_bytes()).collect();
    assert_eq!(
        names,
        [&b"a.txt"[..], &b"b.txt"[..], &b"c.txt"[..], &b"d.txt"[..]]
    );

    let header_size = (HEADER_SIZE + entries.len() * ENTRY_SIZE) as u32;
    assert_eq!(entries[0].offset(), header_size);
    for pair in entries.windows(2) {
        let padded = pair[0].padded_size()?;
        assert_eq!(padded % 4, 0);
        assert!(padded - pair[0].size() < 4);
        assert_eq!(pair[0].offset() + padded, pair[1].offset());
    }
    Ok(())
}

#[test]
fn identical_inputs_build_identical_images() -> Result<(), Error> {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("src");
    fs::create_dir(&dir).unwrap();
    write_files(&dir, &[("one", b"contents one"), ("two", b"contents two!")]);

    let first = tmp.path().join("first.img");
    let second = tmp.path().join("second.img");
    create(&dir, &first)?;
    create(&dir, &second)?;

    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
    Ok(())
}

#[test]
fn round_trip_extract() -> Result<(), Error> {
    let files: &[(&str, &[u8])] = &[
        ("index.html", b"<html>hi</html>"),
        ("app.js", b"console.log(1);\n"),
        ("empty", b""),
    ];

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("src");
    fs::create_dir(&dir).unwrap();
    write_files(&dir, files);
    let image_path = tmp.path().join("www.img");

    create(&dir, &image_path)?;
    verify(&image_path)?;
    list(&image_path)?;

    let out = tmp.path().join("out");
    fs::create_dir(&out).unwrap();
    extract(&image_path, &out)?;

    for (name, contents) in files {
        assert_eq!(fs::read(out.join(name)).unwrap(), *contents);
    }
    Ok(())
}

#[test]
fn verify_detects_payload_corruption() -> Result<(), Error> {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("src");
    fs::create_dir(&dir).unwrap();
    write_files(&dir, &[("a.txt", b"hello")]);
    let image_path = tmp.path().join("out.img");

    create(&dir, &image_path)?;

    let mut image = fs::read(&image_path).unwrap();
    let last = image.len() - 1;
    image[last] ^= 0xFF;
    fs::write(&image_path, image).unwrap();

    assert!(matches!(
        verify(&image_path),
        Err(Error::Core(CoreError::InvalidChecksum))
    ));
    Ok(())
}

#[test]
fn verify_detects_table_corruption() -> Result<(), Error> {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("src");
    fs::create_dir(&dir).unwrap();
    write_files(&dir, &[("a.txt", b"hello")]);
    let image_path = tmp.path().join("out.img");

    create(&dir, &image_path)?;

    let mut image = fs::read(&image_path).unwrap();
    image[HEADER_SIZE] ^= 1;
    fs::write(&image_path, image).unwrap();

    assert!(matches!(
        verify(&image_path),
        Err(Error::Core(CoreError::InvalidChecksum))
    ));
    Ok(())
}

// Well-formed image whose entry name is a path, which the builder refuses
// to produce
fn forge_image(name: &[u8], contents: &[u8]) -> Vec<u8> {
    let mut padded = contents.to_vec();
    while padded.len() % 4 != 0 {
        padded.push(0);
    }

    let mut entry = Entry {
        name: [0; NAME_SIZE],
        size: contents.len() as u32,
        checksum: negating_sum(&padded).unwrap(),
        offset: (HEADER_SIZE + ENTRY_SIZE) as u32,
    };
    entry.name[..name.len()].copy_from_slice(name);

    let table = bytemuck::bytes_of(&entry);
    let header = Header {
        magic: MAGIC,
        checksum: header_checksum(1, table).unwrap(),
        count: 1,
    };

    let mut image = Vec::new();
    image.extend_from_slice(bytemuck::bytes_of(&header));
    image.extend_from_slice(table);
    image.extend_from_slice(&padded);
    image
}

#[test]
fn extract_rejects_path_names() {
    let tmp = tempfile::tempdir().unwrap();
    let image_path = tmp.path().join("forged.img");
    fs::write(&image_path, forge_image(b"../evil", b"gotcha")).unwrap();

    let out = tmp.path().join("out");
    fs::create_dir(&out).unwrap();

    let result = extract(&image_path, &out);
    assert!(matches!(result, Err(Error::InvalidName(_))));
    assert!(!tmp.path().join("evil").exists());
}

#[test]
fn bad_magic_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let image_path = tmp.path().join("bad.img");
    let mut image = forge_image(b"ok", b"data");
    image[3] = 0;
    fs::write(&image_path, image).unwrap();

    assert!(matches!(
        verify(&image_path),
        Err(Error::Core(CoreError::InvalidMagic(_)))
    ));
}
