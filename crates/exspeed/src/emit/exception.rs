//! C++ rendering: failures are thrown and unwind through every caller.

use super::{Backend, EmissionVariant, INTERFACE_FILE};
use crate::graph::{NodeId, FAN_OUT};
use crate::rng::{NEXT_SYMBOL, STATE_SYMBOL};
use crate::spec::GraphSpec;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExceptionBackend;

impl Backend for ExceptionBackend {
    fn variant(&self) -> EmissionVariant {
        EmissionVariant::ExceptionStyle
    }

    fn language(&self) -> &'static str {
        "cpp"
    }

    fn source_extension(&self) -> &'static str {
        "cpp"
    }

    fn executable_name(&self) -> &'static str {
        "cppprog"
    }

    fn signature(&self, node: NodeId) -> String {
        format!("int {}()", node.symbol())
    }

    fn render_entry(&self, spec: &GraphSpec, entry: NodeId) -> String {
        format!(
            r#"#include <cstdio>
#include "{header}"

uint64_t {state};

int main() {{
    int ok = 0;
    int fail = 0;
    {state} = UINT64_C({seed});
    const int rounds = {rounds};
    for (int i = 0; i < rounds; i++) {{
        try {{
            ok += {entry}();
        }} catch (...) {{
            fail++;
        }}
    }}
    printf("OK: %d\nFail: %d\n", ok, fail);
    return 0;
}}
"#,
            header = INTERFACE_FILE,
            state = STATE_SYMBOL,
            seed = spec.seed(),
            rounds = spec.rounds(),
            entry = entry.symbol(),
        )
    }

    fn render_dispatch(&self, node: NodeId, successors: &[NodeId; FAN_OUT as usize]) -> String {
        let mut out = format!(
            "#include \"{}\"\n\n{} {{\n    int selector = (int)({}() % {});\n",
            INTERFACE_FILE,
            self.signature(node),
            NEXT_SYMBOL,
            FAN_OUT,
        );
        let (branches, last) = successors.split_at(successors.len() - 1);
        for (selector, successor) in branches.iter().enumerate() {
            out.push_str(&format!(
                "    if (selector == {}) {{\n        return {}();\n    }}\n",
                selector,
                successor.symbol()
            ));
        }
        out.push_str(&format!("    return {}();\n}}\n", last[0].symbol()));
        out
    }

    fn render_terminal(&self, node: NodeId, threshold: u32) -> String {
        format!(
            r#"#include <stdexcept>
#include "{header}"

{signature} {{
    int x = (int)({next}() % 100);
    if (x < {threshold}) {{
        throw std::runtime_error("Error");
    }}
    return 1;
}}
"#,
            header = INTERFACE_FILE,
            signature = self.signature(node),
            next = NEXT_SYMBOL,
            threshold = threshold,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_calls_each_successor() {
        let successors = [NodeId(4), NodeId(5), NodeId(6), NodeId(6), NodeId(6)];
        let text = ExceptionBackend.render_dispatch(NodeId(3), &successors);
        assert!(text.contains("int node3() {"));
        assert!(text.contains("exspeed_next() % 5"));
        assert!(text.contains("if (selector == 0) {\n        return node4();"));
        assert!(text.contains("if (selector == 3) {\n        return node6();"));
        assert!(text.ends_with("    return node6();\n}\n"));
        assert!(!text.contains("selector == 4"));
    }

    #[test]
    fn test_terminal_throws() {
        let text = ExceptionBackend.render_terminal(NodeId(9), 25);
        assert!(text.contains("int node9() {"));
        assert!(text.contains("if (x < 25)"));
        assert!(text.contains("throw std::runtime_error(\"Error\");"));
    }

    #[test]
    fn test_entry_seeds_before_first_call() {
        let spec = GraphSpec::new(4, 77, 1).unwrap().with_seed(9);
        let text = ExceptionBackend.render_entry(&spec, NodeId(0));
        let seed_at = text.find("exspeed_rng_state = UINT64_C(9);").unwrap();
        let call_at = text.find("node0()").unwrap();
        assert!(seed_at < call_at);
        assert!(text.contains("const int rounds = 77;"));
        assert!(text.contains("catch (...)"));
        assert!(text.contains(r#"printf("OK: %d\nFail: %d\n", ok, fail);"#));
    }
}
