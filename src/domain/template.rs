// Text rules for embedding files into Helm templates
use regex::{NoExpand, Regex};
use std::sync::LazyLock;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const ESCAPED_OPEN: &str = "{{`{{";
const ESCAPED_CLOSE: &str = "}}`}}";

static JOB_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"job="[^"\n]*""#).expect("invalid job label pattern"));

/// Escape template delimiters so a Helm render prints them literally.
///
/// `{{` becomes ``{{`{{`` and `}}` becomes ``}}`}}``.
pub fn escape_delimiters(text: &str) -> String {
    rewrite(text, &[(OPEN, ESCAPED_OPEN), (CLOSE, ESCAPED_CLOSE)])
}

/// Inverse of [`escape_delimiters`].
pub fn unescape_delimiters(text: &str) -> String {
    rewrite(text, &[(ESCAPED_OPEN, OPEN), (ESCAPED_CLOSE, CLOSE)])
}

// Single left-to-right pass, first matching pattern wins at each position.
fn rewrite(text: &str, rules: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'scan: while let Some(ch) = rest.chars().next() {
        for (from, to) in rules {
            if let Some(tail) = rest.strip_prefix(from) {
                out.push_str(to);
                rest = tail;
                continue 'scan;
            }
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

/// Rewrite every `job="<anything>"` matcher to `job="<value>"`.
pub fn substitute_job_label(text: &str, value: &str) -> String {
    let replacement = format!("job=\"{}\"", value);
    JOB_LABEL
        .replace_all(text, NoExpand(&replacement))
        .into_owned()
}

/// Wrap `body` in a named template definition.
pub fn define_block(name: &str, body: &str) -> String {
    let mut out = format!("{{{{ define \"{}.tpl\" }}}}\n", name);
    out.push_str(body);
    out.push_str("{{ end }}");
    out
}

/// Keep `values` up to the first line mentioning `<search_var>:`, then append
/// the rules as an indented block scalar under `<search_var>.<file_name>.rules`.
pub fn splice_values_section(values: &str, search_var: &str, file_name: &str, rules: &str) -> String {
    let marker = format!("{}:", search_var);
    let mut out: String = values
        .split_inclusive('\n')
        .take_while(|line| !line.contains(&marker))
        .collect();

    out.push_str(&format!("{}:\n", search_var));
    out.push_str(&format!("  {}.rules: |-\n", file_name));
    for line in rules.split_inclusive('\n') {
        out.push_str("    ");
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_delimiters() {
        assert_eq!(
            escape_delimiters("summary: {{ $labels.job }} down"),
            "summary: {{`{{ $labels.job }}`}} down"
        );
        assert_eq!(escape_delimiters("no braces { here }"), "no braces { here }");
    }

    #[test]
    fn test_escape_round_trip() {
        let samples = [
            "{{ $value }}",
            "{{{ nested }}}",
            "}}{{",
            "{{`{{ already escaped }}`}}",
            "a { b } {{c}} }} {{",
            "héllo {{ wörld }}",
            "",
        ];
        for sample in samples {
            assert_eq!(unescape_delimiters(&escape_delimiters(sample)), sample, "{sample:?}");
        }
    }

    #[test]
    fn test_job_label_unchanged_when_equal() {
        let rules = r#"expr: up{job="kubelet"} == 0"#;
        assert_eq!(substitute_job_label(rules, "kubelet"), rules);
    }

    #[test]
    fn test_job_label_rewrites_every_matcher() {
        let rules = "expr: up{job=\"kubelet\"} == 0\nexpr: absent(up{job=\"node-exporter\"})\n";
        let out = substitute_job_label(rules, "foo");
        assert_eq!(out, "expr: up{job=\"foo\"} == 0\nexpr: absent(up{job=\"foo\"})\n");
    }

    #[test]
    fn test_job_label_replacement_is_literal() {
        let out = substitute_job_label(r#"up{job="x"}"#, "$1");
        assert_eq!(out, r#"up{job="$1"}"#);
    }

    #[test]
    fn test_define_block() {
        assert_eq!(
            define_block("node.rules.yaml", "groups: []\n"),
            "{{ define \"node.rules.yaml.tpl\" }}\ngroups: []\n{{ end }}"
        );
    }

    #[test]
    fn test_splice_values_section() {
        let values = "image: prom\nreplicas: 1\nruleFiles:\n  old.rules: |-\n    stale\n";
        let rules = "groups:\n- name: node\n";
        let out = splice_values_section(values, "ruleFiles", "node", rules);
        assert_eq!(
            out,
            "image: prom\nreplicas: 1\nruleFiles:\n  node.rules: |-\n    groups:\n    - name: node\n"
        );
    }

    #[test]
    fn test_splice_without_marker_appends() {
        let out = splice_values_section("image: prom\n", "ruleFiles", "etcd3", "a: b");
        assert_eq!(out, "image: prom\nruleFiles:\n  etcd3.rules: |-\n    a: b");
    }
}
