#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::{self, Read};

    use crate::dump::dump;
    use crate::error::CompileError;
    use crate::node::{NodeData, Tree};
    use crate::parse::{parse, Parser};
    use crate::validate::check_tree;

    fn tree(src: &str) -> Tree {
        let tree = parse(src.as_bytes()).unwrap();
        check_tree(&tree).unwrap();
        tree
    }

    fn dumped(src: &str) -> String {
        dump(&tree(src))
    }

    fn lines(expected: &[&str]) -> String {
        let mut out = expected.join("\n");
        out.push('\n');
        out
    }

    #[test]
    fn test_empty_input() {
        let t = tree("");
        assert_eq!(t.len(), 1);
        assert!(!t.has_children(Tree::ROOT));
        assert_eq!(t.component_name(), "");
    }

    #[test]
    fn test_named_root() {
        let parsed = Parser::new("<b>x</b>".as_bytes())
            .with_name("Card")
            .parse()
            .unwrap();
        assert_eq!(parsed.tree.component_name(), "Card");
        assert!(parsed.dependencies.is_empty());
    }

    #[test]
    fn test_range_extends_path() {
        assert_eq!(
            dumped("{#items}{name}{/items}{after}"),
            lines(&[
                r#"component """#,
                r#"  range "items" @items*"#,
                r#"    variable "name" @items*"#,
                r#"  variable "after""#,
            ])
        );
    }

    #[test]
    fn test_dotted_range() {
        assert_eq!(
            dumped("{#user.friends}{name}{/user.friends}"),
            lines(&[
                r#"component """#,
                r#"  range "user.friends" @user.friends*"#,
                r#"    variable "name" @user.friends*"#,
            ])
        );
    }

    #[test]
    fn test_nested_ranges() {
        assert_eq!(
            dumped("{#groups}{#items}{label}{/items}{title}{/groups}"),
            lines(&[
                r#"component """#,
                r#"  range "groups" @groups*"#,
                r#"    range "items" @groups*.items*"#,
                r#"      variable "label" @groups*.items*"#,
                r#"    variable "title" @groups*"#,
            ])
        );
    }

    #[test]
    fn test_conditionals_keep_path() {
        assert_eq!(
            dumped("{#rows}{?ok}{v}{/ok}{^ok}-{/ok}{/rows}"),
            lines(&[
                r#"component """#,
                r#"  range "rows" @rows*"#,
                r#"    when "ok" @rows*"#,
                r#"      variable "v" @rows*"#,
                r#"    unless "ok" @rows*"#,
                r#"      text "-" @rows*"#,
            ])
        );
    }

    #[test]
    fn test_close_tag_restores_path() {
        // The range is never closed; leaving the div ends its scope.
        assert_eq!(
            dumped("<div>{#items}<p>{x}</p></div>{v}"),
            lines(&[
                r#"component """#,
                r#"  element <div>"#,
                r#"    range "items" @items*"#,
                r#"      element <p> @items*"#,
                r#"        variable "x" @items*"#,
                r#"  variable "v""#,
            ])
        );
    }

    #[test]
    fn test_void_elements_are_not_opened() {
        assert_eq!(
            dumped(r#"<div><img src="a.png"><b>x</b></div>"#),
            lines(&[
                r#"component """#,
                r#"  element <div>"#,
                r#"    element <img> src="a.png""#,
                r#"    element <b>"#,
                r#"      text "x""#,
            ])
        );
        // A stray close for a void element matches nothing.
        let t = tree("<img><a/></img>");
        assert_eq!(t.children(Tree::ROOT).count(), 2);
        assert!(t.children(Tree::ROOT).all(|c| !t.has_children(c)));
    }

    #[test]
    fn test_self_closing_is_not_opened() {
        assert_eq!(
            dumped("<span/>after"),
            lines(&[r#"component """#, r#"  element <span>"#, r#"  text "after""#])
        );
    }

    #[test]
    fn test_mismatched_close_tags() {
        assert_eq!(
            dumped("<div><span>x</div>y</b>z"),
            lines(&[
                r#"component """#,
                r#"  element <div>"#,
                r#"    element <span>"#,
                r#"      text "x""#,
                r#"  text "y""#,
                r#"  text "z""#,
            ])
        );
    }

    #[test]
    fn test_end_control_closes_open_elements() {
        assert_eq!(
            dumped("{?ok}<div><span>{/ok}<b></b>"),
            lines(&[
                r#"component """#,
                r#"  when "ok""#,
                r#"    element <div>"#,
                r#"      element <span>"#,
                r#"  element <b>"#,
            ])
        );
    }

    #[test]
    fn test_orphan_end_control_unwinds_to_root() {
        assert_eq!(
            dumped("<div>{/nope}<span></span>"),
            lines(&[r#"component """#, r#"  element <div>"#, r#"  element <span>"#])
        );
        assert_eq!(
            dumped("{#items}<p>{/nope}{v}"),
            lines(&[
                r#"component """#,
                r#"  range "items" @items*"#,
                r#"    element <p> @items*"#,
                r#"  variable "v""#,
            ])
        );
    }

    #[test]
    fn test_unclosed_at_eof() {
        assert_eq!(
            dumped("<div><p>text"),
            lines(&[
                r#"component """#,
                r#"  element <div>"#,
                r#"    element <p>"#,
                r#"      text "text""#,
            ])
        );
    }

    #[test]
    fn test_component_references() {
        let t = tree("<user-card><b>x</b></user-card>{y}<checked/>");
        let kids: Vec<_> = t.children(Tree::ROOT).collect();
        assert_eq!(kids.len(), 3);
        assert_eq!(t.tag_name(kids[0]), "user-card");
        assert!(matches!(
            &t.node(kids[0]).data,
            NodeData::Element { atom, .. } if !atom.is_known()
        ));
        assert!(matches!(&t.node(kids[1]).data, NodeData::Variable { .. }));
        // Known attribute name, but not an element.
        assert_eq!(t.tag_name(kids[2]), "checked");
    }

    #[test]
    fn test_dependencies_in_first_reference_order() {
        let lookup: HashMap<String, usize> = [("avatar", 0), ("card", 1), ("footer-bar", 2)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let parsed = Parser::new(r#"<div><card/><avatar src="{u}"/><card></card><other/></div>"#.as_bytes())
            .with_name("Page")
            .with_lookup(&lookup)
            .parse()
            .unwrap();
        assert_eq!(parsed.dependencies, vec![1, 0]);
    }

    #[test]
    fn test_host_element_is_never_a_dependency() {
        let lookup: HashMap<String, usize> =
            [("div".to_string(), 0)].into_iter().collect();
        let parsed = Parser::new("<div></div>".as_bytes())
            .with_lookup(&lookup)
            .parse()
            .unwrap();
        assert!(parsed.dependencies.is_empty());
    }

    #[test]
    fn test_attributes() {
        let t = tree(r#"<label for="x" data-id="{ id }" on-click="{go}" title="a {b}"></label>"#);
        let label = t.children(Tree::ROOT).next().unwrap();
        let NodeData::Element { attrs, .. } = &t.node(label).data else {
            panic!("expected an element");
        };
        assert_eq!(attrs.len(), 4);

        assert_eq!(attrs[0].key, "for");
        assert_eq!(attrs[0].key_atom.as_str(), "for");
        assert!(!attrs[0].is_expression);

        assert_eq!(attrs[1].key, "data-id");
        assert!(!attrs[1].key_atom.is_known());
        assert_eq!(attrs[1].value, "id");
        assert!(attrs[1].is_expression);

        assert_eq!(attrs[2].key, "onClick");
        assert_eq!(attrs[2].value, "go");
        assert!(attrs[2].is_expression);

        assert_eq!(attrs[3].value, "a {b}");
        assert!(!attrs[3].is_expression);
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(
            dumped("<div>\n  <p>  Hello   world </p>\n</div>"),
            lines(&[
                r#"component """#,
                r#"  element <div>"#,
                r#"    element <p>"#,
                r#"      text " Hello world ""#,
            ])
        );
    }

    #[test]
    fn test_preformatted_text_is_verbatim() {
        let t = tree("<pre>  a\n  b</pre><p>  a\n  b</p>");
        let texts: Vec<String> = t
            .ids()
            .filter_map(|id| match &t.node(id).data {
                NodeData::Text { text } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["  a\n  b".to_string(), " a b".to_string()]);
    }

    #[test]
    fn test_comment_and_variable_names_are_trimmed() {
        assert_eq!(
            dumped("{!  hi there  }{ user.name }"),
            lines(&[
                r#"component """#,
                r#"  comment "hi there""#,
                r#"  variable "user.name""#,
            ])
        );
    }

    #[test]
    fn test_empty_braces_are_dropped() {
        assert_eq!(
            dumped("<p>{}{   }x{?}y{/}{#}{/ }</p>"),
            lines(&[
                r#"component """#,
                r#"  element <p>"#,
                r#"    text "x""#,
                r#"    text "y""#,
            ])
        );
        let out = crate::codegen::render_to_string(&tree("<p>{ }</p>")).unwrap();
        assert!(!out.contains("{props}"));
    }

    #[test]
    fn test_invalid_utf8_is_a_tokenizer_error() {
        let bytes: &[u8] = &[b'<', b'b', b'>', 0xff];
        assert!(matches!(parse(bytes), Err(CompileError::Tokenizer(_))));
    }

    #[test]
    fn test_read_failure_is_io_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "gone"))
            }
        }
        assert!(matches!(parse(Broken), Err(CompileError::Io(_))));
    }

    #[test]
    fn test_json_form() {
        let json = tree("{#items}{name}{/items}").to_json().unwrap();
        assert!(json.contains(r#""type": "range""#));
        assert!(json.contains(r#""isIteration": true"#));
    }
}
