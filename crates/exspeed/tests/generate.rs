//! Structural properties of the generated program pair.

use exspeed::{generate, FileKind, GraphSpec, SourceTree};

fn spec(depth: u32, error_percent: u32) -> GraphSpec {
    GraphSpec::new(depth, 1000, error_percent).unwrap()
}

fn declarations(tree: &SourceTree) -> Vec<String> {
    tree.interface()
        .unwrap()
        .contents
        .lines()
        .filter(|l| l.starts_with("int node"))
        .map(str::to_string)
        .collect()
}

/// Node symbols named in `call` expressions, e.g. `node12(`.
fn called_nodes(text: &str) -> Vec<u32> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(at) = rest.find("node") {
        rest = &rest[at + 4..];
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if !digits.is_empty() && rest[digits.len()..].starts_with('(') {
            found.push(digits.parse().unwrap());
        }
    }
    found
}

#[test]
fn test_both_trees_have_depth_plus_one_nodes() {
    for depth in [0, 1, 5, 37, 200] {
        let (exception, error_code) = generate(&spec(depth, 1));
        for tree in [&exception, &error_code] {
            assert_eq!(tree.node_count(), depth as usize + 1);
            let indices: Vec<u32> = tree
                .files
                .iter()
                .filter_map(|f| match f.kind {
                    FileKind::Node(i) => Some(i),
                    _ => None,
                })
                .collect();
            assert_eq!(indices, (0..=depth).collect::<Vec<_>>());
        }
    }
}

#[test]
fn test_successors_never_exceed_depth() {
    let depth = 23;
    let (exception, error_code) = generate(&spec(depth, 3));
    for tree in [&exception, &error_code] {
        for file in tree.node_files() {
            let FileKind::Node(index) = file.kind else {
                unreachable!()
            };
            for callee in called_nodes(&file.contents) {
                if callee == index {
                    continue; // the function's own definition
                }
                assert!(callee > index, "{} calls backwards to {}", file.name, callee);
                assert!(callee <= depth, "{} calls past the terminal", file.name);
                assert!(callee <= (index + 5).min(depth));
            }
        }
    }
}

#[test]
fn test_interface_declares_each_node_once() {
    let depth = 12;
    let (exception, error_code) = generate(&spec(depth, 1));
    let cpp = declarations(&exception);
    let c = declarations(&error_code);
    assert_eq!(cpp.len(), depth as usize + 1);
    assert_eq!(c.len(), depth as usize + 1);
    for (i, (cpp_decl, c_decl)) in cpp.iter().zip(&c).enumerate() {
        assert_eq!(cpp_decl, &format!("int node{}();", i));
        assert_eq!(c_decl, &format!("int node{}(char **error);", i));
    }
}

#[test]
fn test_generation_is_deterministic() {
    let spec = spec(64, 5).with_seed(1234);
    assert_eq!(generate(&spec), generate(&spec));
}

#[test]
fn test_shared_random_stream_text_is_identical() {
    let (exception, error_code) = generate(&spec(4, 1));
    let prelude = |tree: &SourceTree| {
        let text = &tree.interface().unwrap().contents;
        text[..text.find("int node0").unwrap()].to_string()
    };
    assert_eq!(prelude(&exception), prelude(&error_code));
}

#[test]
fn test_zero_depth_is_well_formed() {
    let (exception, error_code) = generate(&spec(0, 0));
    for tree in [&exception, &error_code] {
        assert_eq!(tree.node_count(), 1);
        let only = tree.node_files().next().unwrap();
        assert!(only.contents.contains("% 100"));
        assert!(!only.contents.contains("selector"));
        assert_eq!(called_nodes(&only.contents), vec![0]);
        assert_eq!(declarations(tree).len(), 1);
    }
}

#[test]
fn test_write_to_materializes_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let (exception, _) = generate(&spec(3, 1));
    exception.write_to(dir.path()).unwrap();
    for file in &exception.files {
        let on_disk = std::fs::read_to_string(dir.path().join(&file.name)).unwrap();
        assert_eq!(on_disk, file.contents);
    }
}
