//! Integration tests for CSS selector parsing and matching.

use quokka_css::HtmlDocument;
use quokka_css::selector::{
    AttributeSelector, Combinator, SimpleSelector, Specificity, parse_selector,
    parse_selector_list,
};
use quokka_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

fn make_element(tag: &str, id: Option<&str>, classes: &[&str]) -> ElementData {
    let mut attrs = AttributesMap::new();
    if let Some(id_val) = id {
        let _ = attrs.insert("id", id_val);
    }
    if !classes.is_empty() {
        let _ = attrs.insert("class", classes.join(" "));
    }
    ElementData {
        tag_name: tag.to_string(),
        attrs,
    }
}

/// Scan `html` and return the tree plus the nth element in document order.
fn nth_element(html: &str, n: usize) -> (HtmlDocument, NodeId) {
    let doc = HtmlDocument::parse(html);
    let id = doc.elements().nth(n).unwrap();
    (doc, id)
}

fn matches(selector: &str, html: &str, n: usize) -> bool {
    let (doc, id) = nth_element(html, n);
    parse_selector_list(selector)
        .unwrap()
        .matches_in_tree(doc.tree(), id)
}

// Parsing

#[test]
fn test_parse_type_selector() {
    let selector = parse_selector("td").unwrap();
    assert_eq!(selector.specificity, Specificity(0, 0, 1));
    assert!(selector.complex.combinators.is_empty());
    assert!(matches!(
        &selector.complex.subject.simple_selectors[0],
        SimpleSelector::Type(name) if name == "td"
    ));
}

#[test]
fn test_parse_class_id_universal() {
    assert_eq!(
        parse_selector(".highlight").unwrap().specificity,
        Specificity(0, 1, 0)
    );
    assert_eq!(
        parse_selector("#main-content").unwrap().specificity,
        Specificity(1, 0, 0)
    );
    assert_eq!(parse_selector("*").unwrap().specificity, Specificity(0, 0, 0));
}

#[test]
fn test_parse_multiple_combinators() {
    // [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    let selector = parse_selector("div.container > ul.nav li a.active").unwrap();

    assert_eq!(selector.complex.subject.simple_selectors.len(), 2);
    assert_eq!(selector.complex.combinators.len(), 3);
    assert_eq!(selector.complex.combinators[0].0, Combinator::Descendant);
    assert!(matches!(
        &selector.complex.combinators[0].1.simple_selectors[0],
        SimpleSelector::Type(name) if name == "li"
    ));
    assert_eq!(selector.complex.combinators[1].0, Combinator::Descendant);
    assert_eq!(selector.complex.combinators[2].0, Combinator::Child);

    // .container, .nav, .active; div, ul, li, a
    assert_eq!(selector.specificity, Specificity(0, 3, 4));
}

#[test]
fn test_parse_combinators_without_spaces() {
    let selector = parse_selector("h1+p~span>b").unwrap();
    let kinds: Vec<_> = selector.complex.combinators.iter().map(|(c, _)| *c).collect();
    assert_eq!(
        kinds,
        [
            Combinator::Child,
            Combinator::SubsequentSibling,
            Combinator::NextSibling
        ]
    );
}

#[test]
fn test_parse_invalid_selectors() {
    assert!(parse_selector("> div").is_none());
    assert!(parse_selector("div >").is_none());
    assert!(parse_selector("").is_none());
    assert!(parse_selector("div..a").is_none());
    assert!(parse_selector("a:nth-child(2").is_none());
    assert!(parse_selector("[=x]").is_none());
    assert!(parse_selector("div%").is_none());
}

#[test]
fn test_parse_pseudo_selectors() {
    let hover = parse_selector("a.btn:hover").unwrap();
    assert!(hover.has_pseudo());
    assert_eq!(hover.specificity, Specificity(0, 2, 1));
    assert!(matches!(
        &hover.complex.subject.simple_selectors[2],
        SimpleSelector::PseudoClass(name) if name == "hover"
    ));

    let before = parse_selector("p::before").unwrap();
    assert_eq!(before.specificity, Specificity(0, 0, 2));
    let legacy = parse_selector("p:after").unwrap();
    assert!(matches!(
        &legacy.complex.subject.simple_selectors[1],
        SimpleSelector::PseudoElement(name) if name == "after"
    ));

    let functional = parse_selector("li:nth-child(2n+1)").unwrap();
    assert!(matches!(
        &functional.complex.subject.simple_selectors[1],
        SimpleSelector::PseudoClass(name) if name == "nth-child(2n+1)"
    ));

    assert!(!parse_selector("td.a > p").unwrap().has_pseudo());
}

#[test]
fn test_parse_attribute_selectors() {
    let cases = [
        ("[href]", AttributeSelector::Exists("href".into())),
        (
            "[type=text]",
            AttributeSelector::Equals("type".into(), "text".into()),
        ),
        (
            "[ Title = \"a b\" ]",
            AttributeSelector::Equals("title".into(), "a b".into()),
        ),
        (
            "[class~=a]",
            AttributeSelector::Includes("class".into(), "a".into()),
        ),
        (
            "[lang|=en]",
            AttributeSelector::DashMatch("lang".into(), "en".into()),
        ),
        (
            "[href^='https']",
            AttributeSelector::PrefixMatch("href".into(), "https".into()),
        ),
        (
            "[src$=\".png\"]",
            AttributeSelector::SuffixMatch("src".into(), ".png".into()),
        ),
        (
            "[data-x*=dark]",
            AttributeSelector::SubstringMatch("data-x".into(), "dark".into()),
        ),
    ];
    for (raw, expected) in cases {
        let selector = parse_selector(raw).unwrap();
        assert_eq!(
            selector.complex.subject.simple_selectors,
            [SimpleSelector::Attribute(expected)],
            "{raw}"
        );
        assert_eq!(selector.specificity, Specificity(0, 1, 0));
    }
}

#[test]
fn test_parse_selector_list() {
    let list = parse_selector_list("td.a, #b, [data-x=\"1,2\"]").unwrap();
    assert_eq!(list.selectors.len(), 3);
    assert!(parse_selector_list("td, > p").is_none());
    assert!(parse_selector_list("td, a:hover").unwrap().has_pseudo());
}

// Matching

#[test]
fn test_match_simple_selectors() {
    let mut tree = DomTree::new();
    let element = make_element("DIV", Some("main"), &["box", "wide"]);
    let div = tree.create_element(&element.tag_name, element.attrs);
    tree.append_child(NodeId::ROOT, div);

    for raw in ["div", "*", ".box", ".wide", "#main", "div.box#main"] {
        assert!(parse_selector(raw).unwrap().matches_in_tree(&tree, div), "{raw}");
    }
    for raw in [".narrow", "#other", "span", "div:hover", "div::before"] {
        assert!(!parse_selector(raw).unwrap().matches_in_tree(&tree, div), "{raw}");
    }
    assert!(!parse_selector("div").unwrap().matches_in_tree(&tree, NodeId::ROOT));
}

#[test]
fn test_matches_in_manual_tree() {
    let mut tree = DomTree::new();
    let div = tree.alloc(NodeType::Element(make_element(
        "div",
        None,
        &["container"],
    )));
    let span = tree.alloc(NodeType::Element(make_element("span", None, &[])));
    tree.append_child(NodeId::ROOT, div);
    tree.append_child(div, span);

    assert!(parse_selector(".container span").unwrap().matches_in_tree(&tree, span));
    assert!(!parse_selector("ul span").unwrap().matches_in_tree(&tree, span));
}

#[test]
fn test_matches_descendant_and_child() {
    let html = "<div class=\"c\"><p><span>t</span></p></div>";
    assert!(matches("div span", html, 2));
    assert!(matches(".c p", html, 1));
    assert!(matches("p > span", html, 2));
    assert!(!matches("div > span", html, 2));
    assert!(!matches("ul span", html, 2));
}

#[test]
fn test_matches_siblings_skip_text() {
    let html = "<div><h1>a</h1> text <p>b</p><span>c</span></div>";
    // h1, p, span are elements 1..=3
    assert!(matches("h1 + p", html, 2));
    assert!(!matches("h1 + span", html, 3));
    assert!(matches("h1 ~ span", html, 3));
    assert!(!matches("span ~ h1", html, 1));
}

#[test]
fn test_matching_backtracks_over_ancestors() {
    // The nearest `.b` ancestor is not a child of `.a`; an outer one is.
    let html = "<div class=\"a\"><div class=\"b\"><div class=\"x\"><div class=\"b\"><p>t</p></div></div></div></div>";
    assert!(matches(".a > .b p", html, 4));
    assert!(!matches(".a > .x p", html, 4));
}

#[test]
fn test_matching_backtracks_over_siblings() {
    // The first `h2` preceding `p` has no `h1` before it, a later one does.
    let html = "<div><h2>1</h2><h1>x</h1><h2>2</h2><p>p</p></div>";
    assert!(matches("h1 + h2 ~ p", html, 4));
    assert!(!matches("h3 + h2 ~ p", html, 4));
}

#[test]
fn test_matches_attributes() {
    let html = "<a href=\"https://x.test/a.png\" lang=\"en-US\" class=\"btn big\" data-theme=\"my-dark\">x</a>";
    for raw in [
        "[href]",
        "[lang|=en]",
        "[class~=big]",
        "[href^=https]",
        "[href$='.png']",
        "[data-theme*=dark]",
        "a[lang=\"en-US\"]",
    ] {
        assert!(matches(raw, html, 0), "{raw}");
    }
    for raw in ["[title]", "[lang|=e]", "[class~=bi]", "[lang=en]"] {
        assert!(!matches(raw, html, 0), "{raw}");
    }
}

#[test]
fn test_type_match_is_case_insensitive() {
    assert!(matches("TD", "<table><tr><td>x</td></tr></table>", 2));
}

#[test]
fn test_list_specificity_is_best_matching_member() {
    let (doc, p) = nth_element("<div id=\"d\"><p class=\"a\">t</p></div>", 1);
    let list = parse_selector_list("p, #d .a, #nope").unwrap();
    assert_eq!(
        list.matching_specificity(doc.tree(), p),
        Some(Specificity(1, 1, 0))
    );
    let list = parse_selector_list("span, #nope").unwrap();
    assert_eq!(list.matching_specificity(doc.tree(), p), None);
}

#[test]
fn test_specificity_ordering() {
    // [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules)
    assert!(Specificity(1, 0, 0) > Specificity(0, 10, 10));
    assert!(Specificity(0, 1, 0) > Specificity(0, 0, 10));
    assert!(Specificity(0, 0, 1) > Specificity::default());
}
