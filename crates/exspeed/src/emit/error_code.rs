//! C rendering: failures travel back through a `char **error` out-parameter.
//!
//! Every internal node checks the flag after its call and short-circuits with
//! `-1`. The check is the cost being measured, so it is emitted even where a
//! compiler could see that the value is simply forwarded.

use super::{Backend, EmissionVariant, INTERFACE_FILE};
use crate::graph::{NodeId, FAN_OUT};
use crate::rng::{NEXT_SYMBOL, STATE_SYMBOL};
use crate::spec::GraphSpec;

#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorCodeBackend;

impl Backend for ErrorCodeBackend {
    fn variant(&self) -> EmissionVariant {
        EmissionVariant::ErrorCodeStyle
    }

    fn language(&self) -> &'static str {
        "c"
    }

    fn source_extension(&self) -> &'static str {
        "c"
    }

    fn executable_name(&self) -> &'static str {
        "cprog"
    }

    fn signature(&self, node: NodeId) -> String {
        format!("int {}(char **error)", node.symbol())
    }

    fn render_entry(&self, spec: &GraphSpec, entry: NodeId) -> String {
        format!(
            r#"#include <stdio.h>
#include <stdlib.h>
#include "{header}"

uint64_t {state};

int main(void) {{
    int ok = 0;
    int fail = 0;
    char *error = NULL;
    {state} = UINT64_C({seed});
    const int rounds = {rounds};
    for (int i = 0; i < rounds; i++) {{
        int res = {entry}(&error);
        if (error) {{
            fail++;
            free(error);
            error = NULL;
        }} else {{
            ok += res;
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
            "#include \"{}\"\n\n{} {{\n    int selector = (int)({}() % {});\n    int res;\n",
            INTERFACE_FILE,
            self.signature(node),
            NEXT_SYMBOL,
            FAN_OUT,
        );
        let (branches, last) = successors.split_at(successors.len() - 1);
        for (selector, successor) in branches.iter().enumerate() {
            let keyword = if selector == 0 { "    if" } else { " else if" };
            out.push_str(&format!(
                "{} (selector == {}) {{\n        res = {}(error);\n    }}",
                keyword,
                selector,
                successor.symbol()
            ));
        }
        out.push_str(&format!(
            " else {{\n        res = {}(error);\n    }}\n",
            last[0].symbol()
        ));
        out.push_str("    if (*error) {\n        return -1;\n    }\n    return res;\n}\n");
        out
    }

    fn render_terminal(&self, node: NodeId, threshold: u32) -> String {
        format!(
            r#"#include <stdlib.h>
#include <string.h>
#include "{header}"

{signature} {{
    int x = (int)({next}() % 100);
    if (x < {threshold}) {{
        char *message = (char *)malloc(sizeof("Error"));
        if (!message) {{
            abort();
        }}
        memcpy(message, "Error", sizeof("Error"));
        *error = message;
        return -1;
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
