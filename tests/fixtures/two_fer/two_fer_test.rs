use crate::two_fer::two_fer;

#[derive(Default)]
pub struct TwoFerTest;

impl TwoFerTest {
    #[fact]
    pub fn no_name_given(&self) {
        assert_eq!("One for you, one for me.", two_fer(None));
    }

    #[fact]
    pub fn a_name_given(&self) {
        assert_eq!("One for Alice, one for me.", two_fer(Some("Alice")));
    }

    #[fact]
    pub fn another_name_given(&self) {
        assert_eq!("One for Bob, one for me.", two_fer(Some("Bob")));
    }
}
