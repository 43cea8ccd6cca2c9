pub fn two_fer(name: Option<&str>) -> String {
    format!("One for {}, one for me.", name.unwrap_or("you"))
}
