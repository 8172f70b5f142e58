//! Element and attribute tables.
//!
//! Atoms are small integer ids for well-known HTML element and attribute
//! names. Id 0 is reserved for "unknown"; every other id is the position of
//! the name in `ATOM_NAMES` plus one, so the mapping is a stable bijection.
//! Tag-scoped attribute rewrites are keyed by `(element << 32) | attribute`.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Atom(u32);

impl Atom {
    pub const UNKNOWN: Atom = Atom(0);

    pub fn lookup(name: &str) -> Atom {
        ATOMS.get(name).copied().unwrap_or(Atom::UNKNOWN)
    }

    pub fn is_known(self) -> bool {
        self.0 != 0
    }

    pub fn id(self) -> u32 {
        self.0
    }

    /// Canonical lower-case name, empty for unknown atoms.
    pub fn as_str(self) -> &'static str {
        match self.0 {
            0 => "",
            n => ATOM_NAMES.get(n as usize - 1).copied().unwrap_or(""),
        }
    }

    /// Key for the tag-scoped rewrite table.
    pub fn scoped_key(element: Atom, attr: Atom) -> u64 {
        (u64::from(element.0) << 32) | u64::from(attr.0)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ATOM NAMES
// ═══════════════════════════════════════════════════════════════════════════════

const ATOM_NAMES: &[&str] = &[
    // Elements
    "a", "abbr", "acronym", "address", "annotation", "annotation-xml", "applet", "area",
    "article", "aside", "audio", "b", "base", "basefont", "bdi", "bdo", "bgsound", "big",
    "blink", "blockquote", "body", "br", "button", "canvas", "caption", "center", "cite",
    "code", "col", "colgroup", "command", "data", "datalist", "dd", "del", "desc", "details",
    "dfn", "dialog", "div", "dl", "dt", "em", "embed", "fieldset", "figcaption", "figure",
    "font", "footer", "foreignobject", "form", "frame", "frameset", "h1", "h2", "h3", "h4",
    "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "image", "img",
    "input", "ins", "isindex", "kbd", "keygen", "label", "legend", "li", "link", "listing",
    "main", "malignmark", "manifest", "map", "mark", "marquee", "math", "menu", "menuitem",
    "meta", "meter", "mglyph", "mi", "mn", "mo", "ms", "mtext", "nav", "nobr", "noembed",
    "noframes", "noscript", "object", "ol", "optgroup", "option", "output", "p", "param",
    "picture", "plaintext", "pre", "progress", "q", "rb", "rp", "rt", "rtc", "ruby", "s",
    "samp", "script", "section", "select", "slot", "small", "source", "spacer", "span",
    "strike", "strong", "style", "sub", "summary", "sup", "svg", "table", "tbody", "td",
    "template", "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track", "tt", "u",
    "ul", "var", "video", "wbr", "xmp",
    // Attributes
    "accept", "accept-charset", "accesskey", "action", "allow", "allowfullscreen", "alt",
    "as", "async", "autocapitalize", "autocomplete", "autofocus", "autoplay", "capture",
    "cellpadding", "cellspacing", "charset", "checked", "class", "cols", "colspan",
    "content", "contenteditable", "controls", "coords", "crossorigin", "datetime", "decoding",
    "default", "defaultchecked", "defaultvalue", "defer", "dir", "dirname", "disabled",
    "download", "draggable", "enctype", "enterkeyhint", "for", "formaction", "formenctype",
    "formmethod", "formnovalidate", "formtarget", "headers", "height", "hidden", "high",
    "href", "hreflang", "http-equiv", "id", "inert", "inputmode", "integrity", "is",
    "ismap", "itemid", "itemprop", "itemref", "itemscope", "itemtype", "kind", "lang", "list",
    "loading", "loop", "low", "max", "maxlength", "media", "method", "min", "minlength",
    "multiple", "muted", "name", "nomodule", "nonce", "novalidate", "open", "optimum",
    "pattern", "ping", "placeholder", "playsinline", "poster", "preload", "readonly",
    "referrerpolicy", "rel", "required", "reversed", "role", "rows", "rowspan", "sandbox",
    "scope", "scoped", "selected", "shape", "size", "sizes", "spellcheck", "src", "srcdoc",
    "srclang", "srcset", "start", "step", "tabindex", "target", "translate", "type", "usemap",
    "value", "width", "wrap",
    // Event handlers
    "onabort", "onafterprint", "onauxclick", "onbeforeprint", "onbeforeunload", "onblur",
    "oncancel", "oncanplay", "oncanplaythrough", "onchange", "onclick", "onclose",
    "oncontextmenu", "oncopy", "oncuechange", "oncut", "ondblclick", "ondrag", "ondragend",
    "ondragenter", "ondragexit", "ondragleave", "ondragover", "ondragstart", "ondrop",
    "ondurationchange", "onemptied", "onended", "onerror", "onfocus", "onhashchange",
    "oninput", "oninvalid", "onkeydown", "onkeypress", "onkeyup", "onload", "onloadeddata",
    "onloadedmetadata", "onloadstart", "onmessage", "onmousedown", "onmouseenter",
    "onmouseleave", "onmousemove", "onmouseout", "onmouseover", "onmouseup", "onoffline",
    "ononline", "onpagehide", "onpageshow", "onpaste", "onpause", "onplay", "onplaying",
    "onpopstate", "onprogress", "onratechange", "onreset", "onresize", "onscroll",
    "onseeked", "onseeking", "onselect", "onshow", "onstalled", "onstorage", "onsubmit",
    "onsuspend", "ontimeupdate", "ontoggle", "onunload", "onvolumechange", "onwaiting",
    "onwheel",
];

// ═══════════════════════════════════════════════════════════════════════════════
// ELEMENT SETS
// ═══════════════════════════════════════════════════════════════════════════════

const COMMON_ELEMENT_NAMES: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col",
    "colgroup", "command", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div",
    "dl", "dt", "em", "embed", "fieldset", "figcaption", "figure", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe",
    "img", "input", "ins", "kbd", "keygen", "label", "legend", "li", "link", "main", "map",
    "mark", "menu", "menuitem", "meta", "meter", "nav", "noscript", "object", "ol",
    "optgroup", "option", "output", "p", "param", "picture", "pre", "progress", "q", "rp",
    "rt", "ruby", "s", "samp", "script", "section", "select", "slot", "small", "source",
    "span", "strong", "style", "sub", "summary", "sup", "table", "tbody", "td", "template",
    "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track", "u", "ul", "var",
    "video", "wbr", "frame", "frameset", "malignmark", "manifest", "rb", "rtc",
    // SVG
    "svg", "desc", "foreignobject", "image",
    // MathML
    "math", "mglyph", "mi", "mn", "mo", "ms", "mtext",
    // Legacy
    "acronym", "xmp", "applet", "annotation", "annotation-xml", "basefont", "bgsound", "big",
    "blink", "center", "font", "isindex", "listing", "marquee", "nobr", "noembed", "noframes",
    "plaintext", "spacer", "strike", "tt",
];

const VOID_ELEMENT_NAMES: &[&str] = &[
    "area", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements where a leading newline in the first text child is significant.
const PREFORMATTED_ELEMENT_NAMES: &[&str] = &["pre", "listing", "textarea"];

const BOOLEAN_ATTR_NAMES: &[&str] = &[
    "allowfullscreen", "async", "autofocus", "autoplay", "checked", "controls", "default",
    "defaultchecked", "defer", "disabled", "formnovalidate", "hidden", "inert", "ismap",
    "itemscope", "loop", "multiple", "muted", "nomodule", "novalidate", "open",
    "playsinline", "readonly", "required", "reversed", "scoped", "selected",
];

// ═══════════════════════════════════════════════════════════════════════════════
// ATTRIBUTE REWRITES
// ═══════════════════════════════════════════════════════════════════════════════

const GLOBAL_REWRITES: &[(&str, &str)] = &[
    ("accesskey", "accessKey"),
    ("autocapitalize", "autoCapitalize"),
    ("autofocus", "autoFocus"),
    ("class", "className"),
    ("contenteditable", "contentEditable"),
    ("enterkeyhint", "enterKeyHint"),
    ("for", "htmlFor"),
    ("inputmode", "inputMode"),
    ("itemid", "itemID"),
    ("itemprop", "itemProp"),
    ("itemref", "itemRef"),
    ("itemscope", "itemScope"),
    ("itemtype", "itemType"),
    ("spellcheck", "spellCheck"),
    ("tabindex", "tabIndex"),
    // Events
    ("onabort", "onAbort"),
    ("onafterprint", "onAfterPrint"),
    ("onauxclick", "onAuxClick"),
    ("onbeforeprint", "onBeforePrint"),
    ("onbeforeunload", "onBeforeUnload"),
    ("onblur", "onBlur"),
    ("oncancel", "onCancel"),
    ("oncanplay", "onCanPlay"),
    ("oncanplaythrough", "onCanPlayThrough"),
    ("onchange", "onChange"),
    ("onclick", "onClick"),
    ("onclose", "onClose"),
    ("oncontextmenu", "onContextMenu"),
    ("oncopy", "onCopy"),
    ("oncuechange", "onCueChange"),
    ("oncut", "onCut"),
    ("ondblclick", "onDoubleClick"),
    ("ondrag", "onDrag"),
    ("ondragend", "onDragEnd"),
    ("ondragenter", "onDragEnter"),
    ("ondragexit", "onDragExit"),
    ("ondragleave", "onDragLeave"),
    ("ondragover", "onDragOver"),
    ("ondragstart", "onDragStart"),
    ("ondrop", "onDrop"),
    ("ondurationchange", "onDurationChange"),
    ("onemptied", "onEmptied"),
    ("onended", "onEnded"),
    ("onerror", "onError"),
    ("onfocus", "onFocus"),
    ("onhashchange", "onHashChange"),
    ("oninput", "onInput"),
    ("oninvalid", "onInvalid"),
    ("onkeydown", "onKeyDown"),
    ("onkeypress", "onKeyPress"),
    ("onkeyup", "onKeyUp"),
    ("onload", "onLoad"),
    ("onloadeddata", "onLoadedData"),
    ("onloadedmetadata", "onLoadedMetadata"),
    ("onloadstart", "onLoadStart"),
    ("onmessage", "onMessage"),
    ("onmousedown", "onMouseDown"),
    ("onmouseenter", "onMouseEnter"),
    ("onmouseleave", "onMouseLeave"),
    ("onmousemove", "onMouseMove"),
    ("onmouseout", "onMouseOut"),
    ("onmouseover", "onMouseOver"),
    ("onmouseup", "onMouseUp"),
    ("onoffline", "onOffline"),
    ("ononline", "onOnline"),
    ("onpagehide", "onPageHide"),
    ("onpageshow", "onPageShow"),
    ("onpaste", "onPaste"),
    ("onpause", "onPause"),
    ("onplay", "onPlay"),
    ("onplaying", "onPlaying"),
    ("onpopstate", "onPopState"),
    ("onprogress", "onProgress"),
    ("onratechange", "onRateChange"),
    ("onreset", "onReset"),
    ("onresize", "onResize"),
    ("onscroll", "onScroll"),
    ("onseeked", "onSeeked"),
    ("onseeking", "onSeeking"),
    ("onselect", "onSelect"),
    ("onshow", "onShow"),
    ("onstalled", "onStalled"),
    ("onstorage", "onStorage"),
    ("onsubmit", "onSubmit"),
    ("onsuspend", "onSuspend"),
    ("ontimeupdate", "onTimeUpdate"),
    ("ontoggle", "onToggle"),
    ("onunload", "onUnload"),
    ("onvolumechange", "onVolumeChange"),
    ("onwaiting", "onWaiting"),
    ("onwheel", "onWheel"),
];

/// (element names, attribute, JSX name)
const SCOPED_REWRITES: &[(&[&str], &str, &str)] = &[
    (&["form"], "accept-charset", "acceptCharset"),
    (&["form"], "enctype", "encType"),
    (&["form"], "novalidate", "noValidate"),
    (&["td", "th"], "colspan", "colSpan"),
    (&["td", "th"], "rowspan", "rowSpan"),
    (&["textarea", "input"], "maxlength", "maxLength"),
    (&["textarea", "input"], "minlength", "minLength"),
    (&["textarea", "input"], "readonly", "readOnly"),
    (&["video", "audio", "input", "select", "textarea", "form"], "autocomplete", "autoComplete"),
    (&["img", "script", "link", "video", "audio", "area"], "crossorigin", "crossOrigin"),
    (&["img", "link", "script", "a", "area", "iframe"], "referrerpolicy", "referrerPolicy"),
    (&["iframe"], "srcdoc", "srcDoc"),
    (&["iframe"], "allowfullscreen", "allowFullScreen"),
    (&["img", "source"], "srcset", "srcSet"),
    (&["img", "object"], "usemap", "useMap"),
    (&["video", "audio"], "autoplay", "autoPlay"),
    (&["video"], "playsinline", "playsInline"),
    (&["track"], "srclang", "srcLang"),
    (&["ins", "del", "time"], "datetime", "dateTime"),
    (&["a", "link"], "hreflang", "hrefLang"),
    (&["a", "script", "meta"], "charset", "charSet"),
    (&["meta"], "http-equiv", "httpEquiv"),
    (&["script"], "nomodule", "noModule"),
    (&["button", "input"], "formaction", "formAction"),
    (&["button", "input"], "formenctype", "formEncType"),
    (&["button", "input"], "formmethod", "formMethod"),
    (&["button", "input"], "formnovalidate", "formNoValidate"),
    (&["button", "input"], "formtarget", "formTarget"),
    // React-only names
    (&["input"], "defaultchecked", "defaultChecked"),
    (&["input", "textarea", "select"], "defaultvalue", "defaultValue"),
    (&["table"], "cellpadding", "cellPadding"),
    (&["table"], "cellspacing", "cellSpacing"),
];

/// SVG attributes whose camel casing is lost by the lower-casing tokenizer.
const SVG_ATTR_CASE: &[(&str, &str)] = &[
    ("attributename", "attributeName"),
    ("attributetype", "attributeType"),
    ("basefrequency", "baseFrequency"),
    ("calcmode", "calcMode"),
    ("clippathunits", "clipPathUnits"),
    ("diffuseconstant", "diffuseConstant"),
    ("edgemode", "edgeMode"),
    ("filterunits", "filterUnits"),
    ("gradienttransform", "gradientTransform"),
    ("gradientunits", "gradientUnits"),
    ("kernelmatrix", "kernelMatrix"),
    ("keypoints", "keyPoints"),
    ("keysplines", "keySplines"),
    ("keytimes", "keyTimes"),
    ("lengthadjust", "lengthAdjust"),
    ("markerheight", "markerHeight"),
    ("markerunits", "markerUnits"),
    ("markerwidth", "markerWidth"),
    ("maskcontentunits", "maskContentUnits"),
    ("maskunits", "maskUnits"),
    ("numoctaves", "numOctaves"),
    ("pathlength", "pathLength"),
    ("patterncontentunits", "patternContentUnits"),
    ("patterntransform", "patternTransform"),
    ("patternunits", "patternUnits"),
    ("preserveaspectratio", "preserveAspectRatio"),
    ("primitiveunits", "primitiveUnits"),
    ("refx", "refX"),
    ("refy", "refY"),
    ("repeatcount", "repeatCount"),
    ("repeatdur", "repeatDur"),
    ("spreadmethod", "spreadMethod"),
    ("startoffset", "startOffset"),
    ("stddeviation", "stdDeviation"),
    ("stitchtiles", "stitchTiles"),
    ("surfacescale", "surfaceScale"),
    ("tablevalues", "tableValues"),
    ("textlength", "textLength"),
    ("viewbox", "viewBox"),
    ("xchannelselector", "xChannelSelector"),
    ("ychannelselector", "yChannelSelector"),
];

/// SVG elements whose camel casing is lost by the lower-casing tokenizer.
const SVG_TAG_CASE: &[(&str, &str)] = &[
    ("animatemotion", "animateMotion"),
    ("animatetransform", "animateTransform"),
    ("clippath", "clipPath"),
    ("feblend", "feBlend"),
    ("fecolormatrix", "feColorMatrix"),
    ("fecomponenttransfer", "feComponentTransfer"),
    ("fecomposite", "feComposite"),
    ("feconvolvematrix", "feConvolveMatrix"),
    ("fediffuselighting", "feDiffuseLighting"),
    ("fedisplacementmap", "feDisplacementMap"),
    ("fedropshadow", "feDropShadow"),
    ("feflood", "feFlood"),
    ("fegaussianblur", "feGaussianBlur"),
    ("feimage", "feImage"),
    ("femerge", "feMerge"),
    ("femergenode", "feMergeNode"),
    ("femorphology", "feMorphology"),
    ("feoffset", "feOffset"),
    ("fespecularlighting", "feSpecularLighting"),
    ("fetile", "feTile"),
    ("feturbulence", "feTurbulence"),
    ("foreignobject", "foreignObject"),
    ("lineargradient", "linearGradient"),
    ("radialgradient", "radialGradient"),
    ("textpath", "textPath"),
];

lazy_static! {
    static ref ATOMS: HashMap<&'static str, Atom> = {
        let mut m = HashMap::with_capacity(ATOM_NAMES.len());
        for (i, name) in ATOM_NAMES.iter().enumerate() {
            // First occurrence wins so ids stay stable.
            m.entry(*name).or_insert(Atom(i as u32 + 1));
        }
        m
    };

    static ref COMMON_ELEMENTS: HashSet<Atom> = atom_set(COMMON_ELEMENT_NAMES);
    static ref VOID_ELEMENTS: HashSet<Atom> = atom_set(VOID_ELEMENT_NAMES);
    static ref PREFORMATTED_ELEMENTS: HashSet<Atom> = atom_set(PREFORMATTED_ELEMENT_NAMES);
    static ref BOOLEAN_ATTRS: HashSet<Atom> = atom_set(BOOLEAN_ATTR_NAMES);

    static ref GLOBAL_REWRITE_TABLE: HashMap<Atom, &'static str> = GLOBAL_REWRITES
        .iter()
        .map(|(attr, jsx)| (Atom::lookup(attr), *jsx))
        .collect();

    static ref SCOPED_REWRITE_TAGS: HashSet<Atom> = SCOPED_REWRITES
        .iter()
        .flat_map(|(tags, _, _)| tags.iter().map(|t| Atom::lookup(t)))
        .collect();

    static ref SCOPED_REWRITE_TABLE: HashMap<u64, &'static str> = {
        let mut m = HashMap::new();
        for (tags, attr, jsx) in SCOPED_REWRITES {
            let attr = Atom::lookup(attr);
            for tag in tags.iter() {
                m.insert(Atom::scoped_key(Atom::lookup(tag), attr), *jsx);
            }
        }
        m
    };

    static ref SVG_ATTR_CASE_MAP: HashMap<&'static str, &'static str> =
        SVG_ATTR_CASE.iter().copied().collect();

    static ref SVG_TAG_CASE_MAP: HashMap<&'static str, &'static str> =
        SVG_TAG_CASE.iter().copied().collect();
}

fn atom_set(names: &[&str]) -> HashSet<Atom> {
    names.iter().map(|n| Atom::lookup(n)).collect()
}

pub fn is_common_element(a: Atom) -> bool {
    a.is_known() && COMMON_ELEMENTS.contains(&a)
}

pub fn is_void_element(a: Atom) -> bool {
    a.is_known() && VOID_ELEMENTS.contains(&a)
}

pub fn is_preformatted(a: Atom) -> bool {
    a.is_known() && PREFORMATTED_ELEMENTS.contains(&a)
}

pub fn is_boolean_attr(a: Atom) -> bool {
    a.is_known() && BOOLEAN_ATTRS.contains(&a)
}

pub fn global_rewrite(attr: Atom) -> Option<&'static str> {
    GLOBAL_REWRITE_TABLE.get(&attr).copied()
}

pub fn has_scoped_rewrites(element: Atom) -> bool {
    element.is_known() && SCOPED_REWRITE_TAGS.contains(&element)
}

pub fn scoped_rewrite(element: Atom, attr: Atom) -> Option<&'static str> {
    SCOPED_REWRITE_TABLE
        .get(&Atom::scoped_key(element, attr))
        .copied()
}

pub fn svg_attr_case(lower: &str) -> Option<&'static str> {
    SVG_ATTR_CASE_MAP.get(lower).copied()
}

pub fn svg_tag_case(lower: &str) -> Option<&'static str> {
    SVG_TAG_CASE_MAP.get(lower).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_bijection() {
        for name in ATOM_NAMES {
            let a = Atom::lookup(name);
            assert!(a.is_known(), "{} should be an atom", name);
            assert_eq!(a.as_str(), *name);
        }
        assert_eq!(Atom::lookup("avatar"), Atom::UNKNOWN);
        assert_eq!(Atom::UNKNOWN.as_str(), "");
    }

    #[test]
    fn test_atom_names_unique() {
        let unique: HashSet<&str> = ATOM_NAMES.iter().copied().collect();
        assert_eq!(unique.len(), ATOM_NAMES.len());
    }

    #[test]
    fn test_every_table_name_is_an_atom() {
        for name in COMMON_ELEMENT_NAMES
            .iter()
            .chain(VOID_ELEMENT_NAMES)
            .chain(BOOLEAN_ATTR_NAMES)
            .chain(GLOBAL_REWRITES.iter().map(|(a, _)| a))
        {
            assert!(Atom::lookup(name).is_known(), "{} missing", name);
        }
        for (tags, attr, _) in SCOPED_REWRITES {
            assert!(Atom::lookup(attr).is_known(), "{} missing", attr);
            for tag in tags.iter() {
                assert!(Atom::lookup(tag).is_known(), "{} missing", tag);
            }
        }
    }

    #[test]
    fn test_scoped_keys_are_distinct() {
        let mut seen = HashSet::new();
        for (tags, attr, _) in SCOPED_REWRITES {
            for tag in tags.iter() {
                let key = Atom::scoped_key(Atom::lookup(tag), Atom::lookup(attr));
                assert!(seen.insert(key), "duplicate pair {}/{}", tag, attr);
            }
        }
    }

    #[test]
    fn test_scoped_rewrites() {
        let form = Atom::lookup("form");
        let td = Atom::lookup("td");
        assert_eq!(scoped_rewrite(form, Atom::lookup("accept-charset")), Some("acceptCharset"));
        assert_eq!(scoped_rewrite(form, Atom::lookup("novalidate")), Some("noValidate"));
        assert_eq!(scoped_rewrite(td, Atom::lookup("colspan")), Some("colSpan"));
        assert_eq!(
            scoped_rewrite(Atom::lookup("iframe"), Atom::lookup("allowfullscreen")),
            Some("allowFullScreen")
        );
        assert_eq!(scoped_rewrite(Atom::lookup("div"), Atom::lookup("colspan")), None);
        assert!(has_scoped_rewrites(form));
        assert!(!has_scoped_rewrites(Atom::lookup("span")));
    }

    #[test]
    fn test_global_rewrites() {
        assert_eq!(global_rewrite(Atom::lookup("class")), Some("className"));
        assert_eq!(global_rewrite(Atom::lookup("for")), Some("htmlFor"));
        assert_eq!(global_rewrite(Atom::lookup("ondblclick")), Some("onDoubleClick"));
        assert_eq!(global_rewrite(Atom::lookup("href")), None);
    }

    #[test]
    fn test_element_sets() {
        assert!(is_void_element(Atom::lookup("img")));
        assert!(!is_void_element(Atom::lookup("div")));
        assert!(is_common_element(Atom::lookup("div")));
        // Known atom, but an attribute rather than an element.
        assert!(!is_common_element(Atom::lookup("checked")));
        assert!(!is_common_element(Atom::UNKNOWN));
        assert!(is_preformatted(Atom::lookup("textarea")));
        assert!(is_boolean_attr(Atom::lookup("novalidate")));
        assert!(!is_boolean_attr(Atom::lookup("href")));
    }

    #[test]
    fn test_svg_case() {
        assert_eq!(svg_attr_case("viewbox"), Some("viewBox"));
        assert_eq!(svg_attr_case("class"), None);
        assert_eq!(svg_tag_case("lineargradient"), Some("linearGradient"));
    }
}
