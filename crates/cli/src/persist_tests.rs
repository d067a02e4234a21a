// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::os::unix::fs::PermissionsExt;

use super::write_atomic;

#[test]
fn creates_owner_only_file_and_directory() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let dir = tmp.path().join("nested");
    let path = dir.join("cache.json");

    write_atomic(&path, b"{\"a\":1}")?;

    assert_eq!(std::fs::read_to_string(&path)?, "{\"a\":1}");
    assert_eq!(std::fs::metadata(&path)?.permissions().mode() & 0o777, 0o600);
    assert_eq!(std::fs::metadata(&dir)?.permissions().mode() & 0o777, 0o700);
    Ok(())
}

#[test]
fn shorter_write_replaces_longer_content() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("cache.json");

    write_atomic(&path, b"a much longer first payload")?;
    write_atomic(&path, b"short")?;

    assert_eq!(std::fs::read_to_string(&path)?, "short");
    Ok(())
}

#[test]
fn leaves_no_temp_files_behind() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("cache.json");

    for i in 0..5 {
        write_atomic(&path, format!("{i}").as_bytes())?;
    }

    let names: Vec<String> = std::fs::read_dir(tmp.path())?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["cache.json".to_owned()]);
    Ok(())
}
