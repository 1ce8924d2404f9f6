mod app_config;

fn foo() {
  println!("foo");
}

pub struct MyClass;

impl MyClass {
  pub fn bar(&self) -> &str {
    "bar"
  }
}

pub fn baz() -> &'static str {
  "baz"
}

/// Doc comment
/// @param to be replaced
/// @returns by parse code
async fn fizzbuzz() -> Result<&'static str, ()> {
  Ok("fizzbuzz")
}
