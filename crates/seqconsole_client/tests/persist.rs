use seqconsole_client::{ensure_download_dir, AtomicFileWriter};

#[test]
fn writes_and_replaces_files_atomically() {
    let dir = tempfile::tempdir().expect("tempdir");
    let writer = AtomicFileWriter::new(dir.path().to_path_buf());

    let path = writer.write("alignment.bam", b"first").expect("write");
    assert_eq!(std::fs::read(&path).expect("read"), b"first");

    // A re-download replaces the previous content.
    let path = writer.write("alignment.bam", b"second").expect("rewrite");
    assert_eq!(std::fs::read(&path).expect("read"), b"second");
}

#[test]
fn creates_missing_download_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("downloads").join("output");
    ensure_download_dir(&nested).expect("ensure");
    assert!(nested.is_dir());

    let writer = AtomicFileWriter::new(nested.clone());
    let path = writer.write("stats.txt", b"ok").expect("write");
    assert!(path.starts_with(&nested));
}

#[test]
fn rejects_a_file_path_as_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("not-a-dir");
    std::fs::write(&file, b"x").expect("fixture");
    assert!(ensure_download_dir(&file).is_err());
}
