//! Skip-marker removal.
//!
//! A skip marker is a name-value attribute argument whose name textually
//! equals [`SKIP_ARGUMENT`], as in `#[fact(Skip = "not implemented")]`.
//! The pass excises the argument and keeps everything else byte-for-byte,
//! recursing through nested argument lists.
//!
//! ## Notes
//!
//! - Removal can leave a degenerate attribute behind (for example `#[fact()]`).
//!   That is deliberate: no repair is attempted here, and whatever the compiler
//!   thinks of the result surfaces as ordinary diagnostics later.
//! - The pass is idempotent. A tree without skip markers folds to itself.

use quote::ToTokens;
use syn::fold::Fold;
use syn::punctuated::Punctuated;
use syn::{Attribute, Meta, MetaList, Token};

use super::SKIP_ARGUMENT;

/// Rewriter deleting every skip marker it visits.
#[derive(Debug, Default)]
pub struct UnskipTests;

impl Fold for UnskipTests {
    fn fold_attribute(&mut self, attr: Attribute) -> Attribute {
        if let Meta::List(list) = &attr.meta {
            if let Some(scrubbed) = scrub_arguments(list) {
                return Attribute {
                    meta: Meta::List(scrubbed),
                    ..attr
                };
            }
        }
        attr
    }
}

/// Remove skip arguments from a list, or `None` when nothing changed.
///
/// Returning `None` for the unchanged case keeps untouched attributes exactly
/// as written instead of re-rendering their token streams.
fn scrub_arguments(list: &MetaList) -> Option<MetaList> {
    let args = list
        .parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
        .ok()?;

    let mut changed = false;
    let mut kept: Punctuated<Meta, Token![,]> = Punctuated::new();
    for meta in args {
        match meta {
            Meta::NameValue(nv) if nv.path.is_ident(SKIP_ARGUMENT) => changed = true,
            Meta::List(inner) => match scrub_arguments(&inner) {
                Some(scrubbed) => {
                    changed = true;
                    kept.push(Meta::List(scrubbed));
                }
                None => kept.push(Meta::List(inner)),
            },
            other => kept.push(other),
        }
    }

    changed.then(|| MetaList {
        path: list.path.clone(),
        delimiter: list.delimiter.clone(),
        tokens: kept.to_token_stream(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::ToTokens;
    use syn::visit::Visit;

    fn unskip(source: &str) -> syn::File {
        let file = syn::parse_file(source).unwrap();
        UnskipTests.fold_file(file)
    }

    fn render(file: &syn::File) -> String {
        prettyplease::unparse(file)
    }

    /// Count every meta node appearing inside attribute argument lists.
    fn count_attribute_arguments(file: &syn::File) -> usize {
        struct Counter {
            count: usize,
        }

        impl Counter {
            fn count_list(&mut self, list: &MetaList) {
                let Ok(args) = list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated) else {
                    return;
                };
                for meta in args {
                    self.count += 1;
                    if let Meta::List(inner) = meta {
                        self.count_list(&inner);
                    }
                }
            }
        }

        impl<'ast> Visit<'ast> for Counter {
            fn visit_attribute(&mut self, attr: &'ast Attribute) {
                if let Meta::List(list) = &attr.meta {
                    self.count_list(list);
                }
                syn::visit::visit_attribute(self, attr);
            }
        }

        let mut counter = Counter { count: 0 };
        counter.visit_file(file);
        counter.count
    }

    #[test]
    fn removes_skip_argument_and_nothing_else() {
        let before = syn::parse_file(
            r#"
            impl FakeTest {
                #[fact(Skip = "not ready", timeout = 5)]
                pub fn sub_works(&self) {}
            }
            "#,
        )
        .unwrap();
        let before_count = count_attribute_arguments(&before);

        let after = UnskipTests.fold_file(before);
        let rendered = render(&after);

        assert!(!rendered.contains("Skip"));
        assert!(rendered.contains("timeout = 5"));
        assert_eq!(count_attribute_arguments(&after), before_count - 1);
    }

    #[test]
    fn removes_every_marker_across_the_tree() {
        let after = unskip(
            r#"
            impl AlphaTest {
                #[fact(Skip = "a")]
                pub fn one(&self) {}
                #[fact]
                pub fn two(&self) {}
            }
            impl BetaTest {
                #[fact(Skip = "b")]
                pub fn three(&self) {}
            }
            "#,
        );
        assert!(!render(&after).contains("Skip"));
    }

    #[test]
    fn reaches_arguments_nested_in_inner_lists() {
        let after = unskip(
            r#"
            #[suite(cases(Skip = "nested"))]
            pub fn grouped() {}
            "#,
        );
        let rendered = render(&after);
        assert!(!rendered.contains("Skip"));
        assert!(rendered.contains("cases"));
    }

    #[test]
    fn leaves_degenerate_empty_lists_behind() {
        let after = unskip(
            r#"
            impl FakeTest {
                #[fact(Skip = "only argument")]
                pub fn lonely(&self) {}
            }
            "#,
        );
        assert!(render(&after).contains("#[fact()]"));
    }

    #[test]
    fn is_idempotent() {
        let once = unskip(
            r#"
            impl FakeTest {
                #[fact(Skip = "x")]
                pub fn f(&self) {}
            }
            "#,
        );
        let twice = UnskipTests.fold_file(once.clone());
        assert_eq!(
            once.to_token_stream().to_string(),
            twice.to_token_stream().to_string()
        );
    }

    #[test]
    fn keeps_unrelated_files_identical() {
        let source = r#"
            #[derive(Debug, Clone)]
            pub struct Plain {
                #[allow(dead_code)]
                field: u8,
            }
            "#;
        let before = syn::parse_file(source).unwrap();
        let after = UnskipTests.fold_file(before.clone());
        assert_eq!(
            before.to_token_stream().to_string(),
            after.to_token_stream().to_string()
        );
    }

    #[test]
    fn skip_matching_is_case_sensitive() {
        let after = unskip(
            r#"
            impl FakeTest {
                #[fact(skip = "lowercase is not a marker")]
                pub fn f(&self) {}
            }
            "#,
        );
        assert!(render(&after).contains("skip = \"lowercase is not a marker\""));
    }
}
