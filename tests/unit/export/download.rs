use super::*;

fn scratch_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dpframe-download-{tag}-{}", std::process::id()))
}

#[test]
fn filename_collapses_whitespace_runs() {
    assert_eq!(
        export_filename("Jane Q Doe", Status::Junior),
        "Jane_Q_Doe_junior_dp.png"
    );
    assert_eq!(
        export_filename("Ana \t  Cruz", Status::Senior),
        "Ana_Cruz_senior_dp.png"
    );
    assert_eq!(
        export_filename(" Lee ", Status::Freshman),
        "_Lee__freshman_dp.png"
    );
}

#[test]
fn filename_replaces_path_separators() {
    assert_eq!(
        export_filename("Jane/Doe", Status::Junior),
        "Jane_Doe_junior_dp.png"
    );
    assert_eq!(
        export_filename("..\\up / here", Status::Sophomore),
        ".._up___here_sophomore_dp.png"
    );
}

#[test]
fn names_with_slashes_still_deliver() {
    let dir = scratch_dir("slash");
    let _ = std::fs::remove_dir_all(&dir);
    let sink = DirectoryDownloads::new(&dir);

    let name = export_filename("Jane/Doe", Status::Junior);
    sink.deliver(&name, b"png-bytes").unwrap();

    assert_eq!(
        std::fs::read(dir.join("Jane_Doe_junior_dp.png")).unwrap(),
        b"png-bytes"
    );
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn failed_rename_removes_part_file() {
    let dir = scratch_dir("blocked");
    let _ = std::fs::remove_dir_all(&dir);
    // a non-empty directory sits where the download should land
    let blocker = dir.join("a_senior_dp.png");
    std::fs::create_dir_all(&blocker).unwrap();
    std::fs::write(blocker.join("keep"), b"x").unwrap();
    let sink = DirectoryDownloads::new(&dir);

    let err = sink.deliver("a_senior_dp.png", b"png-bytes").unwrap_err();
    assert!(matches!(err, DpError::Other(_)), "{err}");
    assert!(!dir.join("a_senior_dp.png.part").exists());
    assert!(blocker.join("keep").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn delivered_file_lands_without_part_leftovers() {
    let dir = scratch_dir("ok");
    let _ = std::fs::remove_dir_all(&dir);
    let sink = DirectoryDownloads::new(dir.join("nested"));

    sink.deliver("a_junior_dp.png", b"png-bytes").unwrap();

    let dest = sink.path_for("a_junior_dp.png");
    assert_eq!(std::fs::read(&dest).unwrap(), b"png-bytes");
    assert!(!sink.dir().join("a_junior_dp.png.part").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn names_with_separators_are_rejected() {
    let sink = DirectoryDownloads::new(scratch_dir("reject"));
    for bad in ["", "..", "../escape.png", "sub/dir.png", "a\\b.png"] {
        let err = sink.deliver(bad, b"x").unwrap_err();
        assert!(matches!(err, DpError::Export(_)), "{bad}: {err}");
    }
}
