//! Built-in Python curriculum.
//!
//! The fixed question set every bank starts from. Teachers extend it with
//! custom questions stored in the `questions` collection.

use crate::model::{Difficulty, Question};

type Entry = (&'static str, [&'static str; 4], &'static str);

const EASY: &[Entry] = &[
    ("What is the file extension of a Python source file?", [".pt", ".py", ".python", ".pyt"], ".py"),
    ("Which function prints to the screen?", ["echo()", "print()", "write()", "out()"], "print()"),
    ("How does a single-line comment start in Python?", ["//", "#", "/*", "<!--"], "#"),
    ("Which of these is a valid variable name?", ["1count", "count_1", "count-1", "count 1"], "count_1"),
    ("What type is the value of type(10)?", ["int", "float", "str", "bool"], "int"),
    ("What type is the value of type(3.14)?", ["int", "float", "str", "bool"], "float"),
    ("Which of these defines a list?", ["(1, 2, 3)", "{1, 2, 3}", "[1, 2, 3]", "\"1,2,3\""], "[1, 2, 3]"),
    ("What does len([10, 20, 30]) return?", ["2", "3", "4", "An error"], "3"),
    ("Which is the assignment operator?", ["==", "=", ":=", "=>"], "="),
    ("What is 5 + 3 * 2?", ["16", "11", "13", "10"], "11"),
    ("With a = 10 and b = 3, what is a % b?", ["0", "1", "3", "An error"], "1"),
    ("What does input() do?", ["Prints text", "Reads keyboard input", "Opens a file", "Exits the program"], "Reads keyboard input"),
    ("With a = [1, 2, 3], what is a[1]?", ["1", "2", "3", "An error"], "2"),
    ("What does not True evaluate to?", ["True", "False", "None", "An error"], "False"),
    ("How are code blocks delimited in Python?", ["Parentheses", "Commas", "Indentation", "Semicolons"], "Indentation"),
];

const MEDIUM: &[Entry] = &[
    ("With a = 'Python', what is a[1:4]?", ["'Pyt'", "'yth'", "'ytho'", "'thon'"], "'yth'"),
    ("Which values does range(1, 4) produce?", ["1, 2, 3", "1, 2, 3, 4", "0, 1, 2", "2, 3, 4"], "1, 2, 3"),
    ("What does break do inside a loop?", ["Ends the loop", "Skips one iteration", "Deletes a variable", "Ends the function"], "Ends the loop"),
    ("What does continue do inside a loop?", ["Ends the loop", "Skips to the next iteration", "Raises an error", "Ends the function"], "Skips to the next iteration"),
    ("Which keyword defines a function?", ["function", "def", "fun", "lambda"], "def"),
    ("With a = [1, 2, 3], what is a after a.insert(1, 10)?", ["[1, 10, 2, 3]", "[10, 1, 2, 3]", "[1, 2, 10, 3]", "[1, 2, 3, 10]"], "[1, 10, 2, 3]"),
    ("With a = [1, 2, 3], what is a after a.pop()?", ["[1, 2]", "[2, 3]", "[1, 3]", "[]"], "[1, 2]"),
    ("What is special about a set?", ["It is ordered", "It holds no duplicates", "It is indexable", "It only holds ints"], "It holds no duplicates"),
    ("With a = [1, 2, 3]; b = a; b.append(4), what is a?", ["[1, 2, 3]", "[1, 2, 3, 4]", "[4, 1, 2, 3]", "An error"], "[1, 2, 3, 4]"),
    ("How is a default parameter value declared?", ["def f(a, b: 0)", "def f(a, b = 0)", "def f(a, b == 0)", "def f(a, b := 0)"], "def f(a, b = 0)"),
    ("What is try/except used for?", ["Writing loops", "Writing conditions", "Catching errors", "Defining functions"], "Catching errors"),
    ("What does with open('f.txt') as f: guarantee?", ["The file is closed automatically", "The file is copied", "The file is encrypted", "Nothing"], "The file is closed automatically"),
    ("What does '-'.join(['a', 'b', 'c']) return?", ["'abc'", "'a-b-c'", "'a-bc'", "'ab-c'"], "'a-b-c'"),
    ("What does enumerate(items) yield?", ["Only indices", "Only values", "Index and value pairs", "Nothing"], "Index and value pairs"),
    ("What does filter(f, items) do?", ["Sorts items", "Reverses items", "Keeps items where f is true", "Copies items"], "Keeps items where f is true"),
];

const HARD: &[Entry] = &[
    ("What is [x for x in range(5) if x % 2 == 0]?", ["[0, 1, 2, 3, 4]", "[1, 3]", "[0, 2, 4]", "[2, 4]"], "[0, 2, 4]"),
    ("What does lambda x: x * 2 represent?", ["A class", "An anonymous function", "A module", "A package"], "An anonymous function"),
    ("What does *args accept in def f(*args)?", ["Any number of positional arguments", "Any number of keyword arguments", "No arguments", "Exactly one argument"], "Any number of positional arguments"),
    ("What does **kwargs accept in def f(**kwargs)?", ["Any number of positional arguments", "Any number of keyword arguments", "A list", "A set"], "Any number of keyword arguments"),
    ("Which keyword turns a function into a generator?", ["yield", "return", "generate", "async"], "yield"),
    ("What is the role of __init__ in a class?", ["Loads a module", "Initializes a new instance", "Deletes the class", "Nothing special"], "Initializes a new instance"),
    ("Which syntax makes class B inherit from A?", ["class B -> A:", "class B(A):", "class B:A", "class B = A:"], "class B(A):"),
    ("When does a finally block run?", ["Only on error", "Only without error", "Always", "Never"], "Always"),
    ("What is a decorator used for?", ["Deleting a function", "Adding behaviour to a function", "Creating a module", "Declaring a variable"], "Adding behaviour to a function"),
    ("Which methods make up the iterator protocol?", ["__iter__ and __next__", "__add__ and __sub__", "__init__ and __del__", "__get__ and __set__"], "__iter__ and __next__"),
    ("What is list(map(lambda x: x * 2, [1, 2, 3]))?", ["[1, 2, 3]", "[2, 4, 6]", "[0, 1, 2]", "[1, 4, 9]"], "[2, 4, 6]"),
    ("What is the drawback of from module import *?", ["None", "It can cause name clashes", "It deletes the module", "It is always slower"], "It can cause name clashes"),
    ("What is a virtual environment for?", ["Changing the OS", "Per-project dependency management", "Deleting files", "Removing Python versions"], "Per-project dependency management"),
    ("What is async/await used for?", ["Multiple inheritance", "Asynchronous programming", "File management", "Defining decorators"], "Asynchronous programming"),
    ("What is PEP 8?", ["The standard library", "The Python style guide", "A package manager", "A test framework"], "The Python style guide"),
];

/// Built-in questions for one tier, in curriculum order.
pub fn builtin_questions(difficulty: Difficulty) -> Vec<Question> {
    let entries = match difficulty {
        Difficulty::Easy => EASY,
        Difficulty::Medium => MEDIUM,
        Difficulty::Hard => HARD,
    };

    entries
        .iter()
        .filter_map(|(text, choices, answer)| {
            match Question::new(*text, choices.map(String::from), *answer, difficulty) {
                Ok(q) => Some(q),
                Err(e) => {
                    tracing::warn!("skipping built-in {difficulty} question {text:?}: {e}");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_question_is_valid() {
        for (difficulty, entries) in [
            (Difficulty::Easy, EASY),
            (Difficulty::Medium, MEDIUM),
            (Difficulty::Hard, HARD),
        ] {
            assert_eq!(builtin_questions(difficulty).len(), entries.len());
        }
    }

    #[test]
    fn builtin_tiers_support_default_exam() {
        for difficulty in Difficulty::ALL {
            assert!(builtin_questions(difficulty).len() >= 5);
        }
    }

    #[test]
    fn builtin_questions_carry_their_tier() {
        assert!(builtin_questions(Difficulty::Hard)
            .iter()
            .all(|q| q.difficulty() == Difficulty::Hard));
    }
}
