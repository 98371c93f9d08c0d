#[cfg(test)]
mod tests {
    use ampify_rs::parser::*;

    use ampify_rs::*;
    use serde::{Deserialize, Serialize};

    use std::fs::File;
    use std::io::Read;
    use std::path::Path;
    use test_generator::test_resources;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    struct FixtureOptions {
        pub base_url: String,
        #[serde(default)]
        pub fallback_width: Option<u32>,
        #[serde(default)]
        pub fallback_height: Option<u32>,
        #[serde(default)]
        pub embed_label: Option<String>,
        #[serde(default)]
        pub image_layout: Option<String>,
    }

    impl FixtureOptions {
        fn to_sanitize_options(&self) -> SanitizeOptions {
            let mut options = SanitizeOptions::new(&self.base_url);
            if let Some(width) = self.fallback_width {
                options.fallback_width = width;
            }
            if let Some(height) = self.fallback_height {
                options.fallback_height = height;
            }
            if let Some(label) = &self.embed_label {
                options.embed_label = label.clone();
            }
            if let Some(layout) = &self.image_layout {
                options.image_layout = layout.clone();
            }
            options
        }
    }

    const TEST_FIXTURE_DIR: &str = "./";

    fn collapse_whitespace(input: &str) -> String {
        return regex::Regex::new(r"\s+")
            .unwrap()
            .replace_all(input, " ")
            .trim()
            .to_string();
    }

    fn is_blank_text(n: &NodeRef) -> bool {
        n.as_text()
            .map(|t| t.borrow().trim().is_empty())
            .unwrap_or(false)
    }

    fn equal_trees(expected: &NodeRef, actual: &NodeRef) -> bool {
        let mut stack: Vec<(NodeRef, NodeRef, String)> =
            vec![(expected.clone(), actual.clone(), "root".to_string())];

        let summarize = |n: &NodeRef| {
            if let Some(name) = n.element_name() {
                name.to_string()
            } else if n.as_text().is_some() {
                let t = n.text_contents();
                let t = t.trim().chars().take(30).collect::<String>();
                format!("text:{}", t)
            } else {
                "node".to_string()
            }
        };

        while let Some((expected_node, actual_node, path)) = stack.pop() {
            if expected_node.element_name() != actual_node.element_name() {
                println!(
                    "Failed: element names don't match at {}: {:#?}\n\n{:#?}",
                    path,
                    expected_node.element_name(),
                    actual_node.element_name()
                );
                return false;
            }

            match (expected_node.as_element(), actual_node.as_element()) {
                (Some(l), Some(r)) => {
                    if l.attributes.borrow().map != r.attributes.borrow().map {
                        println!(
                            "Failed: attributes don't match at {}: Expected: {:#?}\n\nActual:{:#?}",
                            path,
                            l.attributes.borrow().map,
                            r.attributes.borrow().map
                        );
                        return false;
                    }
                }
                (Some(_), None) | (None, Some(_)) => {
                    println!(
                        "Failed: node types don't match at {}: {:#?}\n\nActual:{:#?}",
                        path, expected_node, actual_node
                    );
                    return false;
                }
                (None, None) => (),
            }

            match (expected_node.as_text(), actual_node.as_text()) {
                (Some(_), Some(_)) => {
                    let expected_text = collapse_whitespace(&expected_node.text_contents());
                    let actual_text = collapse_whitespace(&actual_node.text_contents());
                    if expected_text != actual_text {
                        println!(
                            "Failed: text nodes doesn't match at {}: Expected: {} \n\n Actual: {}",
                            path, expected_text, actual_text
                        );
                        return false;
                    }
                    continue;
                }
                (Some(_), None) | (None, Some(_)) => {
                    println!(
                        "Failed: node types don't match at {}: {:#?}\n\nActual:{:#?}",
                        path, expected_node, actual_node
                    );
                    return false;
                }
                (None, None) => (),
            }

            let expected_children = expected_node
                .children()
                .filter(|n| n.as_comment().is_none() && !is_blank_text(n))
                .collect::<Vec<_>>();
            let actual_children = actual_node
                .children()
                .filter(|n| n.as_comment().is_none() && !is_blank_text(n))
                .collect::<Vec<_>>();
            if expected_children.len() != actual_children.len() {
                let expected_names = expected_children
                    .iter()
                    .map(|n| summarize(n))
                    .collect::<Vec<_>>();
                let actual_names = actual_children
                    .iter()
                    .map(|n| summarize(n))
                    .collect::<Vec<_>>();
                println!(
                    "Failed: child counts don't match at {}: {:#?} vs {:#?}\nExpected: {:?}\nActual: {:?}",
                    path,
                    expected_children.len(),
                    actual_children.len(),
                    expected_names,
                    actual_names
                );
                return false;
            }

            for (i, expected_child_node) in expected_children.iter().enumerate() {
                let actual_child_node = actual_children.get(i).unwrap();
                let child_path = format!("{}/{}", path, i);
                stack.push((
                    expected_child_node.clone(),
                    actual_child_node.clone(),
                    child_path,
                ));
            }
        }

        true
    }

    pub fn html_contents_are_equal(expected: &str, actual: &str) -> bool {
        let e_root = parse_fragment(expected);
        let a_root = parse_fragment(actual);
        equal_trees(&e_root, &a_root)
    }

    fn test(resource: &str) {
        let source = get_source_from_dir(resource);
        let options = get_options_from_dir(resource).to_sanitize_options();
        let result = sanitize_with_options(source.as_str(), &options);

        let expected = get_expected_from_dir(resource);
        let equal = html_contents_are_equal(expected.as_str(), result.html.as_str());
        assert!(equal);

        let again = sanitize_with_options(result.html.as_str(), &options);
        assert_eq!(again.html, result.html);
    }

    fn get_file_content(file_path: &str) -> String {
        let path = Path::new(file_path);
        let mut content = String::new();
        let mut file = File::open(path).unwrap();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn get_source_from_dir(dir: &str) -> String {
        let fil_path = format!("{}{}/source.html", TEST_FIXTURE_DIR, dir);
        get_file_content(fil_path.as_str())
    }

    fn get_options_from_dir(dir: &str) -> FixtureOptions {
        let fil_path = format!("{}{}/options.json", TEST_FIXTURE_DIR, dir);
        let options_string = get_file_content(fil_path.as_str());
        let options: FixtureOptions = serde_json::from_str(options_string.as_str()).unwrap();
        options
    }

    fn get_expected_from_dir(dir: &str) -> String {
        let fil_path = format!("{}{}/expected.html", TEST_FIXTURE_DIR, dir);
        get_file_content(fil_path.as_str())
    }

    #[test_resources("./tests/fixtures/*")]
    fn run(resource: &str) {
        if resource.ends_with("DS_Store") {
            return;
        }
        test(resource);
    }

    #[test]
    fn debug_this() {
        let resource = match std::env::var("AMPIFY_DEBUG_RESOURCE") {
            Ok(value) => value,
            Err(_) => return,
        };
        let source = get_source_from_dir(resource.as_str());
        let options = get_options_from_dir(resource.as_str()).to_sanitize_options();
        let actual = sanitize_with_options(source.as_str(), &options).html;
        let expected = get_expected_from_dir(resource.as_str());
        std::fs::write("/tmp/ampify-expected.html", expected.as_bytes()).unwrap();
        std::fs::write("/tmp/ampify-actual.html", actual.as_bytes()).unwrap();
        println!("Wrote /tmp/ampify-expected.html and /tmp/ampify-actual.html");
    }
}
