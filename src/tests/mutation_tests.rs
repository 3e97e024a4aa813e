#[cfg(test)]
mod tests {
    use crate::fs::{copy, create_directory, create_directory_at, delete, move_entry, rename, FsError};
    use crate::types::EntryKind;
    use std::fs;
    use std::path::Path;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn touch(path: &Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    // create_directory

    #[test]
    fn test_create_directory() {
        let dir = TempDir::new().unwrap();
        let entry = create_directory(dir.path(), "photos").unwrap();

        assert_eq!(entry.name, "photos");
        assert_eq!(entry.kind, EntryKind::Directory);
        assert!(dir.path().join("photos").is_dir());
    }

    #[test]
    fn test_create_directory_collision() {
        let dir = TempDir::new().unwrap();
        create_directory(dir.path(), "photos").unwrap();
        assert!(matches!(create_directory(dir.path(), "photos"), Err(FsError::AlreadyExists(_))));

        // A file occupies the name just as well
        touch(&dir.path().join("notes"), "x");
        assert!(matches!(create_directory(dir.path(), "notes"), Err(FsError::AlreadyExists(_))));
    }

    #[test]
    fn test_create_directory_check_order() {
        let dir = TempDir::new().unwrap();
        let missing_parent = dir.path().join("missing");

        // Name problems win over a missing parent
        assert!(matches!(create_directory(&missing_parent, ""), Err(FsError::InvalidName(_))));
        assert!(matches!(create_directory(&missing_parent, "ok"), Err(FsError::ParentNotFound(_))));
        assert!(matches!(create_directory_at(&missing_parent.join("ok")), Err(FsError::ParentNotFound(_))));
    }

    #[test]
    fn test_create_directory_rejects_separators() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(create_directory(dir.path(), "a/b"), Err(FsError::InvalidName(_))));
        assert!(matches!(create_directory(dir.path(), ".."), Err(FsError::InvalidName(_))));
        assert!(!dir.path().join("a").exists());
    }

    // rename

    #[test]
    fn test_rename_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("draft.txt");
        touch(&source, "text");

        let entry = rename(&source, "final.txt").unwrap();
        assert_eq!(entry.name, "final.txt");
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(dir.path().join("final.txt")).unwrap(), "text");
    }

    #[test]
    fn test_rename_empty_name_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("keep.txt");
        touch(&source, "x");

        assert!(matches!(rename(&source, ""), Err(FsError::InvalidName(_))));
        // Validation happens before the source is even looked at
        assert!(matches!(rename(&dir.path().join("missing"), ""), Err(FsError::InvalidName(_))));
        assert!(source.exists());
    }

    #[test]
    fn test_rename_collision_and_missing_source() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.txt"), "a");
        touch(&dir.path().join("b.txt"), "b");

        assert!(matches!(rename(&dir.path().join("a.txt"), "b.txt"), Err(FsError::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "b");

        assert!(matches!(rename(&dir.path().join("ghost.txt"), "c.txt"), Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_rename_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("old")).unwrap();
        touch(&dir.path().join("old").join("inside.txt"), "i");

        let entry = rename(&dir.path().join("old"), "new").unwrap();
        assert_eq!(entry.kind, EntryKind::Directory);
        assert!(dir.path().join("new").join("inside.txt").exists());
    }

    // delete

    #[test]
    fn test_delete_file_and_tree() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f.txt");
        touch(&file, "x");
        delete(&file).unwrap();
        assert!(!file.exists());

        let tree = dir.path().join("tree");
        fs::create_dir_all(tree.join("a").join("b")).unwrap();
        touch(&tree.join("a").join("b").join("deep.txt"), "d");
        delete(&tree).unwrap();
        assert!(!tree.exists());
    }

    #[test]
    fn test_delete_missing() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(delete(&dir.path().join("nothing")), Err(FsError::NotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_symlink_keeps_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        touch(&target.join("precious.txt"), "p");
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        delete(&link).unwrap();
        assert!(fs::symlink_metadata(&link).is_err());
        assert!(target.join("precious.txt").exists());
    }

    // copy

    #[test]
    fn test_copy_without_collision_keeps_name() {
        let src_dir = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let source = src_dir.path().join("source.txt");
        touch(&source, "payload");

        let entry = copy(&source, dest.path()).unwrap();
        assert_eq!(entry.name, "source.txt");
        assert_eq!(entry.size, 7);
        assert!(source.exists());
    }

    #[test]
    fn test_copy_collision_naming() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        touch(&source, "payload");

        let first = copy(&source, dir.path()).unwrap();
        assert_eq!(first.name, "source - Copy.txt");
        let second = copy(&source, dir.path()).unwrap();
        assert_eq!(second.name, "source - Copy (2).txt");
        let third = copy(&source, dir.path()).unwrap();
        assert_eq!(third.name, "source - Copy (3).txt");

        assert_eq!(fs::read_to_string(dir.path().join("source - Copy (3).txt")).unwrap(), "payload");
    }

    #[test]
    fn test_copy_dotfile_keeps_whole_name_as_extension() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join(".bashrc");
        touch(&source, "alias ll='ls -l'");

        let first = copy(&source, dir.path()).unwrap();
        assert_eq!(first.name, " - Copy.bashrc");
        let second = copy(&source, dir.path()).unwrap();
        assert_eq!(second.name, " - Copy (2).bashrc");
        assert_eq!(fs::read_to_string(dir.path().join(" - Copy.bashrc")).unwrap(), "alias ll='ls -l'");
    }

    #[test]
    fn test_copy_directory_tree() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("project");
        fs::create_dir_all(project.join("src").join("nested")).unwrap();
        touch(&project.join("README"), "readme");
        touch(&project.join("src").join("nested").join("lib.rs"), "fn main() {}");
        fs::create_dir(project.join("empty")).unwrap();

        let entry = copy(&project, dir.path()).unwrap();
        assert_eq!(entry.name, "project - Copy");
        assert_eq!(entry.kind, EntryKind::Directory);

        let copied = dir.path().join("project - Copy");
        assert_eq!(fs::read_to_string(copied.join("README")).unwrap(), "readme");
        assert_eq!(fs::read_to_string(copied.join("src").join("nested").join("lib.rs")).unwrap(), "fn main() {}");
        assert!(copied.join("empty").is_dir());
    }

    #[test]
    fn test_copy_preserves_file_mtime() {
        let dir = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let source = dir.path().join("old.txt");
        touch(&source, "old");
        let past = SystemTime::now() - Duration::from_secs(3 * 24 * 3600);
        fs::File::options().write(true).open(&source).unwrap().set_modified(past).unwrap();

        copy(&source, dest.path()).unwrap();
        let copied = fs::metadata(dest.path().join("old.txt")).unwrap().modified().unwrap();
        let drift = copied.duration_since(past).unwrap_or_else(|e| e.duration());
        assert!(drift < Duration::from_secs(2));
    }

    #[test]
    fn test_copy_into_own_subtree_is_rejected() {
        let dir = TempDir::new().unwrap();
        let parent = dir.path().join("parent");
        fs::create_dir_all(parent.join("child")).unwrap();

        assert!(matches!(copy(&parent, &parent), Err(FsError::DestinationInsideSource(_))));
        assert!(matches!(copy(&parent, &parent.join("child")), Err(FsError::DestinationInsideSource(_))));
        assert!(!parent.join("parent - Copy").exists());
    }

    #[test]
    fn test_copy_error_cases() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        touch(&file, "x");

        assert!(matches!(copy(&dir.path().join("ghost"), dir.path()), Err(FsError::NotFound(_))));
        assert!(matches!(copy(&file, &dir.path().join("no_such_dir")), Err(FsError::NotFound(_))));
        assert!(matches!(copy(&file, &file), Err(FsError::NotADirectory(_))));
    }

    // move

    #[test]
    fn test_move_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("dest");
        fs::create_dir(&dest).unwrap();
        let source = dir.path().join("letter.txt");
        touch(&source, "dear");

        let entry = move_entry(&source, &dest).unwrap();
        assert_eq!(entry.name, "letter.txt");
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(dest.join("letter.txt")).unwrap(), "dear");
    }

    #[test]
    fn test_move_collision_is_an_error() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("dest");
        fs::create_dir(&dest).unwrap();
        let source = dir.path().join("letter.txt");
        touch(&source, "new");
        touch(&dest.join("letter.txt"), "old");

        assert!(matches!(move_entry(&source, &dest), Err(FsError::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(&source).unwrap(), "new");
        assert_eq!(fs::read_to_string(dest.join("letter.txt")).unwrap(), "old");
    }

    #[test]
    fn test_move_directory() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("archive");
        fs::create_dir(&dest).unwrap();
        let album = dir.path().join("album");
        fs::create_dir(&album).unwrap();
        touch(&album.join("track.mp3"), "la");

        let entry = move_entry(&album, &dest).unwrap();
        assert_eq!(entry.kind, EntryKind::Directory);
        assert!(!album.exists());
        assert_eq!(fs::read_to_string(dest.join("album").join("track.mp3")).unwrap(), "la");
    }

    #[test]
    fn test_move_into_own_subtree_is_rejected() {
        let dir = TempDir::new().unwrap();
        let parent = dir.path().join("parent");
        fs::create_dir_all(parent.join("child")).unwrap();

        assert!(matches!(move_entry(&parent, &parent.join("child")), Err(FsError::DestinationInsideSource(_))));
        assert!(parent.join("child").is_dir());
    }

    #[test]
    fn test_move_missing_source() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(move_entry(&dir.path().join("ghost"), dir.path()), Err(FsError::NotFound(_))));
    }
}
