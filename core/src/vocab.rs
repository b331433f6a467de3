//! The single vocabulary table of the language.
//!
//! Every checker and every editor-facing provider (hover, completion) reads
//! keywords, built-ins and container types from here, so the lint rules and
//! the documentation shown to users cannot drift apart.

use once_cell::sync::Lazy;

use rustc_hash::FxHashMap;

/// Suffix carried by statement keywords (`if$`, `let$`).
pub const MARKER: char = '$';
/// Prefix required in front of built-in calls (`::print`).
pub const NAMESPACE_PREFIX: &str = "::";
pub const TERMINATOR: char = ';';
pub const COMMENT: char = '#';

/// Names that are always in scope.
pub const IMPLICIT_NAMES: [&str; 3] = ["self", "args", "result"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Required,
    Optional,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    /// Opens a `{ }` body: `if$`, `else`, `elseif$`, `loop$`, `while$`.
    Control,
    Function,
    Class,
    Variable,
    Import,
    Operator,
    Literal,
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub word: &'static str,
    /// Canonical spelling including the marker when one is expected.
    pub spelled: &'static str,
    pub marker: Marker,
    pub kind: KeywordKind,
    pub detail: &'static str,
    pub doc: &'static str,
}

impl Keyword {
    pub fn requires_marker(&self) -> bool {
        self.marker == Marker::Required
    }

    pub fn opens_block(&self) -> bool {
        matches!(self.kind, KeywordKind::Control | KeywordKind::Function | KeywordKind::Class)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    pub name: &'static str,
    pub signature: &'static str,
    pub detail: &'static str,
    pub doc: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerType {
    pub name: &'static str,
    pub detail: &'static str,
    pub example: &'static str,
}

const fn kw(
    word: &'static str,
    spelled: &'static str,
    marker: Marker,
    kind: KeywordKind,
    detail: &'static str,
    doc: &'static str,
) -> Keyword {
    Keyword {
        word,
        spelled,
        marker,
        kind,
        detail,
        doc,
    }
}

const fn entry(name: &'static str, signature: &'static str, detail: &'static str, doc: &'static str) -> Builtin {
    Builtin {
        name,
        signature,
        detail,
        doc,
    }
}

pub static KEYWORDS: &[Keyword] = &[
    kw("if", "if$", Marker::Required, KeywordKind::Control, "Conditional statement",
        "if$ condition {\n    # code\n}"),
    kw("else", "else", Marker::Optional, KeywordKind::Control, "Else clause",
        "if$ condition {\n    # code\n} else {\n    # alternative code\n}"),
    kw("elseif", "elseif$", Marker::Required, KeywordKind::Control, "Else if clause",
        "if$ first {\n    # code\n} elseif$ second {\n    # alternative code\n}"),
    kw("loop", "loop$", Marker::Required, KeywordKind::Control, "Loop statement",
        "loop$ condition {\n    # code\n}"),
    kw("while", "while$", Marker::Required, KeywordKind::Control, "While loop",
        "while$ condition {\n    # code\n}"),
    kw("import", "import$", Marker::Required, KeywordKind::Import, "Import statement",
        "import$ \"module_name\""),
    kw("let", "let$", Marker::Required, KeywordKind::Variable, "Variable declaration",
        "let$ name = value;"),
    kw("func", "func$", Marker::Required, KeywordKind::Function, "Function declaration",
        "func$ name(first, second) {\n    # code\n}"),
    kw("class", "class$", Marker::Required, KeywordKind::Class, "Class declaration",
        "class$ Name {\n    # properties and methods\n}"),
    kw("and", "and", Marker::None, KeywordKind::Operator, "Logical AND",
        "True when both operands are true."),
    kw("or", "or", Marker::None, KeywordKind::Operator, "Logical OR",
        "True when at least one operand is true."),
    kw("not", "not", Marker::None, KeywordKind::Operator, "Logical NOT",
        "Negates a boolean value."),
    kw("true", "true", Marker::None, KeywordKind::Literal, "Boolean true", "The boolean value true."),
    kw("false", "false", Marker::None, KeywordKind::Literal, "Boolean false", "The boolean value false."),
    kw("dict", "dict", Marker::None, KeywordKind::Type, "Dictionary type",
        "let$ table = dict{key1: value1, key2: value2};"),
];

pub static BUILTINS: &[Builtin] = &[
    entry("print", "::print(value)", "Print to console", "Prints values to the console."),
    entry("input", "::input(prompt)", "Read console input", "Reads a line of user input from the console."),
    entry("len", "::len(collection)", "Get length of collection", "Returns the length of a collection."),
    entry("append", "::append(collection, element)", "Append to collection",
        "Appends an element to the end of a collection."),
    entry("prepend", "::prepend(collection, element)", "Prepend to collection",
        "Adds an element to the beginning of a collection."),
    entry("pop", "::pop(collection)", "Remove and return last element",
        "Removes and returns the last element of a collection."),
    entry("insert", "::insert(collection, position, element)", "Insert element at position",
        "Inserts an element at a specific position in a collection."),
    entry("remove", "::remove(collection, element)", "Remove element", "Removes an element from a collection."),
    entry("pattern_match", "::pattern_match(value, pattern)", "Match pattern",
        "Matches a pattern against a value."),
    entry("get", "::get(dictionary, key)", "Get element by key", "Retrieves a value by key from a dictionary."),
    entry("set", "::set(dictionary, key, value)", "Set element by key", "Sets a value by key in a dictionary."),
    entry("keys", "::keys(dictionary)", "Get dictionary keys", "Returns all keys in a dictionary."),
    entry("values", "::values(dictionary)", "Get dictionary values", "Returns all values in a dictionary."),
    entry("push", "::push(stack, element)", "Push to stack", "Pushes an element onto a stack."),
    entry("peek", "::peek(stack)", "Peek at stack top", "Returns the top element of a stack without removing it."),
    entry("size", "::size(collection)", "Get collection size", "Returns the number of elements in a collection."),
    entry("empty", "::empty(collection)", "Check if collection is empty", "Checks if a collection is empty."),
    entry("enqueue", "::enqueue(queue, element)", "Add to queue", "Adds an element to the end of a queue."),
    entry("dequeue", "::dequeue(queue)", "Remove from queue", "Removes and returns the first element of a queue."),
    entry("front", "::front(queue)", "Get front of queue", "Returns the first element of a queue without removing it."),
    entry("back", "::back(queue)", "Get back of queue", "Returns the last element of a queue without removing it."),
    entry("isEmpty", "::isEmpty(collection)", "Check if empty", "Checks if a collection is empty."),
    entry("qsize", "::qsize(queue)", "Get queue size", "Returns the number of elements in a queue."),
    entry("addNode", "::addNode(list, value)", "Add node to linked list", "Adds a new node to a linked list."),
    entry("removeNode", "::removeNode(list, value)", "Remove node from linked list",
        "Removes the node holding `value` from a linked list."),
    entry("find", "::find(list, value)", "Find node in linked list",
        "Finds the node holding `value` in a linked list."),
    entry("head", "::head(list)", "Get first node of linked list", "Returns the first node of a linked list."),
    entry("tail", "::tail(list)", "Get last node of linked list", "Returns the last node of a linked list."),
    entry("lsize", "::lsize(list)", "Get linked list size", "Returns the number of nodes in a linked list."),
    entry("ladd", "::ladd(list, value)", "Add to linked list", "Adds a value to the list."),
    entry("lremove", "::lremove(list, value)", "Remove from linked list", "Removes the first occurrence of a value."),
    entry("lget", "::lget(list, index)", "Get linked list element", "Returns the element at an index."),
    entry("lisEmpty", "::lisEmpty(list)", "Check if linked list is empty",
        "Returns 1 when the list is empty and 0 otherwise."),
    entry("rmatch", "::rmatch(regex, text)", "Regex match", "Returns 1 when the pattern matches the text, 0 otherwise."),
    entry("rfind_all", "::rfind_all(regex, text)", "Regex find all", "Returns every match position in the text."),
    entry("rreplace", "::rreplace(regex, text, replacement)", "Regex replace",
        "Replaces the first match with the replacement text."),
    entry("fopen", "::fopen(filename, mode)", "Open a file", "Opens a .txt file."),
    entry("fread", "::fread(filename)", "Read from a file", "Reads from a .txt file."),
    entry("fwrite", "::fwrite(filename, content)", "Write to a file", "Writes content to a .txt file."),
    entry("fclose", "::fclose(filename)", "Close a file", "Closes a .txt file."),
    entry("to_str", "::to_str(integer)", "Integer to string", "Converts an integer to a string."),
    entry("to_int", "::to_int(string)", "String to integer", "Converts a string to an integer."),
    entry("http_get", "::http_get(url, [headers])", "HTTP GET request", "Makes an HTTP GET request to a URL."),
    entry("http_post", "::http_post(url, data, [headers])", "HTTP POST request",
        "Makes an HTTP POST request to a URL with data."),
    entry("http_put", "::http_put(url, data, [headers])", "HTTP PUT request",
        "Makes an HTTP PUT request to a URL with data."),
    entry("http_delete", "::http_delete(url, [headers])", "HTTP DELETE request",
        "Makes an HTTP DELETE request to a URL."),
];

pub static CONTAINER_TYPES: &[ContainerType] = &[
    ContainerType {
        name: "stack",
        detail: "Stack type: last-in-first-out collection",
        example: "let$ items = <stack>;",
    },
    ContainerType {
        name: "queue",
        detail: "Queue type: first-in-first-out collection",
        example: "let$ jobs = <queue>;",
    },
    ContainerType {
        name: "linked",
        detail: "Linked list type: each element points to the next",
        example: "let$ nodes = <linked>;",
    },
    ContainerType {
        name: "regex",
        detail: "Regular expression type for pattern matching",
        example: "let$ pattern := <regex> \"pattern\"//flags;",
    },
];

static KEYWORD_INDEX: Lazy<FxHashMap<&'static str, &'static Keyword>> = Lazy::new(|| {
    let mut map = FxHashMap::with_capacity_and_hasher(KEYWORDS.len(), Default::default());
    for k in KEYWORDS {
        map.insert(k.word, k);
    }
    map
});

static BUILTIN_INDEX: Lazy<FxHashMap<&'static str, &'static Builtin>> = Lazy::new(|| {
    let mut map = FxHashMap::with_capacity_and_hasher(BUILTINS.len(), Default::default());
    for b in BUILTINS {
        map.insert(b.name, b);
    }
    map
});

pub fn keyword(word: &str) -> Option<&'static Keyword> {
    KEYWORD_INDEX.get(word).copied()
}

/// Looks a keyword up by its written form, with or without the marker.
pub fn keyword_spelled(text: &str) -> Option<&'static Keyword> {
    match text.strip_suffix(MARKER) {
        Some(word) => keyword(word).filter(|k| k.marker != Marker::None),
        None => keyword(text),
    }
}

pub fn builtin(name: &str) -> Option<&'static Builtin> {
    BUILTIN_INDEX.get(name).copied()
}

pub fn container_type(name: &str) -> Option<&'static ContainerType> {
    CONTAINER_TYPES.iter().find(|t| t.name == name)
}

/// Words the undeclared-name heuristic never reports.
pub fn is_reserved(word: &str) -> bool {
    keyword(word).is_some() || builtin(word).is_some() || container_type(word).is_some()
}

/// `<stack>, <queue>, <linked>, or <regex>`
pub(crate) fn container_type_list(conjunction: &str) -> String {
    let names: Vec<String> = CONTAINER_TYPES.iter().map(|t| format!("<{}>", t.name)).collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, {} {}", rest.join(", "), conjunction, last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}
