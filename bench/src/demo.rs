//! Walkthrough scenarios printed by `keyset-bench demo`.

use std::io::Write;

use keyset::{AvlTree, Bst, ChainingTable, Engine, Key, ProbeMethod, ProbingTable};

use crate::Result;

fn inorder(keys: impl Iterator<Item = Key>) -> String {
    format!("{:?}", keys.collect::<Vec<_>>())
}

fn bst_from(keys: &[Key]) -> Bst {
    let mut t = Bst::new();
    for &k in keys {
        t.insert(k);
    }
    t
}

fn print_bst<W: Write>(out: &mut W, t: &Bst) -> Result<()> {
    writeln!(out, "In-order: {}", inorder(t.keys()))?;
    writeln!(out, "Height: {}", t.height())?;
    writeln!(out, "Valid BST: {}", t.is_search_tree())?;
    write!(out, "{}", t.render())?;
    Ok(())
}

fn bst_scenarios<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "== BST scenario 1: basic operations")?;
    let mut t = bst_from(&[50, 30, 70, 20, 40, 60, 80]);
    print_bst(out, &t)?;
    writeln!(out, "Search 40: {}", t.search(40))?;
    writeln!(out, "Search 100: {}", t.search(100))?;
    t.delete(70);
    writeln!(out, "After deleting 70:")?;
    print_bst(out, &t)?;
    writeln!(out)?;

    writeln!(out, "== BST scenario 2: increasing inserts (worst case)")?;
    print_bst(out, &bst_from(&[1, 2, 3, 4, 5, 6, 7]))?;
    writeln!(out)?;

    writeln!(out, "== BST scenario 3: duplicate inserts")?;
    print_bst(out, &bst_from(&[10, 10, 10, 10]))?;
    writeln!(out)?;

    writeln!(out, "== BST scenario 4: deleting a leaf, one child, two children")?;
    let mut t = bst_from(&[50, 30, 70, 20, 40, 60, 80, 35]);
    print_bst(out, &t)?;
    for k in [20, 40, 50] {
        t.delete(k);
        writeln!(out, "After deleting {k}:")?;
        print_bst(out, &t)?;
    }
    writeln!(out)?;
    Ok(())
}

fn avl_scenario<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "== AVL insert/delete scenario")?;
    let mut t = AvlTree::new();
    for k in [50, 30, 70, 20, 40, 60, 80, 10, 25, 35, 45] {
        t.insert(k);
    }
    writeln!(out, "In-order: {}", inorder(t.keys()))?;
    writeln!(out, "Height: {}", t.height())?;
    writeln!(out, "Valid BST: {}", t.is_search_tree())?;
    writeln!(out, "Rotations during inserts: {}", t.rotations())?;
    write!(out, "{}", t.render())?;

    for k in [20, 30, 50] {
        t.delete(k);
    }
    writeln!(out, "After deleting 20, 30, 50:")?;
    writeln!(out, "In-order: {}", inorder(t.keys()))?;
    write!(out, "{}", t.render())?;
    writeln!(out, "Height: {}", t.height())?;
    writeln!(out, "Valid AVL: {}", t.is_balanced())?;
    writeln!(out, "Total rotations: {}", t.rotations())?;
    writeln!(out)?;
    Ok(())
}

fn print_metrics<W: Write>(out: &mut W, engine: &dyn Engine) -> Result<()> {
    writeln!(out, "Report ({}):", engine.name())?;
    for (name, value) in engine.metrics().entries() {
        writeln!(out, "  {name}: {value}")?;
    }
    Ok(())
}

fn chaining_scenario<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "== Chaining table, size 7")?;
    let mut t = ChainingTable::new(7)?;
    for k in [10, 17, 24, 31, 4] {
        t.insert(k);
    }
    write!(out, "{t}")?;
    writeln!(out, "Search 17: {}", t.search(17))?;
    writeln!(out, "Search 99: {}", t.search(99))?;
    t.remove(24);
    writeln!(out, "After removing 24:")?;
    write!(out, "{t}")?;
    print_metrics(out, &t)?;
    writeln!(out)?;
    Ok(())
}

fn double_hashing_scenario<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "== Open addressing, double hashing, size 7")?;
    let mut t = ProbingTable::new(7, ProbeMethod::Double)?;
    for k in [10, 17, 21, 32, 43, 54] {
        t.insert(k)?;
    }
    write!(out, "{t}")?;
    writeln!(out, "Search 21: {}", t.search(21))?;
    writeln!(out, "Search 99: {}", t.search(99))?;
    t.remove(32);
    writeln!(out, "After removing 32:")?;
    write!(out, "{t}")?;
    print_metrics(out, &t)?;
    Ok(())
}

/// Replays every scenario into `out`.
pub fn run_demo<W: Write>(out: &mut W) -> Result<()> {
    bst_scenarios(out)?;
    avl_scenario(out)?;
    chaining_scenario(out)?;
    double_hashing_scenario(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_text() -> String {
        let mut buf = Vec::new();
        run_demo(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_demo_bst_sections() {
        let text = demo_text();
        assert!(text.contains("Search 40: true"));
        assert!(text.contains("Search 100: false"));
        // Increasing inserts degenerate into a chain of 7.
        assert!(text.contains("In-order: [1, 2, 3, 4, 5, 6, 7]\nHeight: 7\n"));
        assert!(text.contains("In-order: [10]\nHeight: 1\n"));
        assert!(text.contains("After deleting 50:\nIn-order: [30, 35, 60, 70, 80]\n"));
    }

    #[test]
    fn test_demo_avl_section() {
        let text = demo_text();
        assert!(text.contains("Rotations during inserts: 0"));
        assert!(text.contains("In-order: [10, 25, 35, 40, 45, 60, 70, 80]"));
        assert!(text.contains("Valid AVL: true"));
    }

    #[test]
    fn test_demo_tables() {
        let text = demo_text();
        assert!(text.contains("After removing 24:\n0: empty\n1: empty\n2: empty\n3: [10, 17, 31]\n4: [4]\n"));
        assert!(text.contains("  collisions: 3\n"));
        assert!(text.contains("After removing 32:\n0: 21\n1: 43\n2: 17\n3: 10\n4: <removed>\n5: 54\n6: empty\n"));
        assert!(text.contains("Search 21: true"));
    }
}
