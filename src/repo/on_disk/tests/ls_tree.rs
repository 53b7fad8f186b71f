use tempfile::tempdir;

use crate::object::{Blob, FileMode, Id, Tree, TreeEntry};
use crate::repo::{Error, LsTreeOptions, OnDisk};

struct Fixture {
    _temp: tempfile::TempDir,
    repo: OnDisk,
    root: Id,
    readme: Id,
    main_rs: Id,
    src: Id,
    lib: Id,
}

// README
// src/
//   lib/
//     a.rs
//   main.rs
fn fixture() -> Fixture {
    let temp = tempdir().unwrap();
    let mut repo = OnDisk::init(temp.path()).unwrap();

    let readme = repo.write_object(&Blob::from("# readme\n").into()).unwrap();
    let main_rs = repo.write_object(&Blob::from("fn main() {}\n").into()).unwrap();
    let a_rs = repo.write_object(&Blob::from("// a\n").into()).unwrap();

    let lib = Tree::new(vec![TreeEntry::new(FileMode::NORMAL, "a.rs", a_rs).unwrap()]);
    let lib = repo.write_object(&lib.into()).unwrap();

    let src = Tree::new(vec![
        TreeEntry::new(FileMode::EXECUTABLE, "main.rs", main_rs).unwrap(),
        TreeEntry::new(FileMode::TREE, "lib", lib).unwrap(),
    ]);
    let src = repo.write_object(&src.into()).unwrap();

    let root = Tree::new(vec![
        TreeEntry::new(FileMode::TREE, "src", src).unwrap(),
        TreeEntry::new(FileMode::NORMAL, "README", readme).unwrap(),
    ]);
    let root = repo.write_object(&root.into()).unwrap();

    Fixture {
        _temp: temp,
        repo,
        root,
        readme,
        main_rs,
        src,
        lib,
    }
}

#[test]
fn top_level() {
    let f = fixture();
    let lines = f.repo.ls_tree(&f.root, LsTreeOptions::default()).unwrap();

    assert_eq!(
        lines,
        vec![
            format!("100644 blob {}\tREADME", f.readme),
            format!("040000 tree {}\tsrc", f.src),
        ]
    );
}

#[test]
fn recursive() {
    let f = fixture();
    let options = LsTreeOptions {
        recursive: true,
        ..LsTreeOptions::default()
    };
    let lines = f.repo.ls_tree(&f.root, options).unwrap();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], format!("100644 blob {}\tREADME", f.readme));
    assert!(lines[1].ends_with("\tsrc/lib/a.rs"));
    assert_eq!(lines[2], format!("100755 blob {}\tsrc/main.rs", f.main_rs));
}

#[test]
fn recursive_with_trees() {
    let f = fixture();
    let options = LsTreeOptions {
        recursive: true,
        show_trees: true,
        name_only: true,
    };
    let lines = f.repo.ls_tree(&f.root, options).unwrap();

    assert_eq!(
        lines,
        vec!["README", "src", "src/lib", "src/lib/a.rs", "src/main.rs"]
    );
}

#[test]
fn name_only() {
    let f = fixture();
    let options = LsTreeOptions {
        name_only: true,
        ..LsTreeOptions::default()
    };

    assert_eq!(f.repo.ls_tree(&f.src, options).unwrap(), vec!["lib", "main.rs"]);
    assert_eq!(f.repo.ls_tree(&f.lib, options).unwrap(), vec!["a.rs"]);
}

#[test]
fn error_not_a_tree() {
    let f = fixture();
    let err = f.repo.ls_tree(&f.readme, LsTreeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::KindMismatch { .. }));
}

#[test]
fn error_missing_subtree() {
    let temp = tempdir().unwrap();
    let mut repo = OnDisk::init(temp.path()).unwrap();

    let missing = Id::from_raw([9; 20]);
    let root = Tree::new(vec![TreeEntry::new(FileMode::TREE, "gone", missing).unwrap()]);
    let root = repo.write_object(&root.into()).unwrap();

    // Not recursing doesn't need the subtree.
    assert_eq!(repo.ls_tree(&root, LsTreeOptions::default()).unwrap().len(), 1);

    let options = LsTreeOptions {
        recursive: true,
        ..LsTreeOptions::default()
    };
    let err = repo.ls_tree(&root, options).unwrap_err();
    match err {
        Error::ObjectNotFound(id) => assert_eq!(id, missing),
        _ => panic!("Unexpected error {:?}", err),
    }
}
