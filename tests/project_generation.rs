use std::collections::BTreeMap;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use uidlgen_lib::chunk::{Chunk, ChunkStore, FileType};
use uidlgen_lib::output::{GeneratedFile, GeneratedFolder};
use uidlgen_lib::plugins::entry_file_generator;
use uidlgen_lib::project::{
    html_strategy, react_strategy, FrameworkContent, FrameworkContext, FrameworkFileStrategy, FrameworkStrategy,
};
use uidlgen_lib::{GenerationError, ProjectGenerator, ProjectUidl};

const PROJECT: &str = r##"{
    "name": "Demo Shop",
    "globals": {
        "settings": { "title": "Demo Shop", "language": "en" },
        "meta": [{ "name": "description", "content": "A demo shop" }],
        "manifest": { "theme_color": "#822cec" }
    },
    "root": {
        "name": "App",
        "node": { "type": "static", "content": "" },
        "styleSetDefinitions": {
            "primaryButton": { "color": "$primary" }
        },
        "designLanguage": { "tokens": { "primary": "#822cec" } }
    },
    "pages": [
        {
            "navLink": "/",
            "component": {
                "name": "Home",
                "node": { "type": "element", "content": {
                    "elementType": "container",
                    "children": [
                        { "type": "element", "content": { "elementType": "ProductCard" } },
                        { "type": "element", "content": {
                            "elementType": "navlink",
                            "attrs": { "transitionTo": { "type": "static", "content": "/blog/post" } },
                            "children": [{ "type": "static", "content": "Blog" }]
                        } }
                    ]
                } }
            }
        },
        {
            "navLink": "/blog/post",
            "component": {
                "name": "Post",
                "outputOptions": { "folderPath": ["blog"] },
                "node": { "type": "element", "content": {
                    "elementType": "container",
                    "children": [
                        { "type": "element", "content": { "elementType": "ProductCard" } }
                    ]
                } }
            }
        }
    ],
    "components": {
        "ProductCard": {
            "name": "ProductCard",
            "node": { "type": "element", "content": {
                "elementType": "text",
                "style": { "fontWeight": "bold" },
                "children": [{ "type": "static", "content": "Product" }]
            } }
        }
    }
}"##;

fn project() -> ProjectUidl {
    ProjectUidl::from_json(PROJECT).unwrap()
}

fn segments(path: &[&str]) -> Vec<String> {
    path.iter().map(|s| s.to_string()).collect()
}

fn content<'a>(folder: &'a GeneratedFolder, path: &[&str], file_name: &str) -> &'a str {
    folder
        .get_file(&segments(path), file_name)
        .unwrap_or_else(|| panic!("missing {}/{}", path.join("/"), file_name))
        .content
        .as_str()
}

#[tokio::test]
async fn test_react_project_layout() {
    let generator = ProjectGenerator::new(react_strategy());
    let folder = generator
        .generate_project(&project(), GeneratedFolder::new("demo-shop"), None)
        .await
        .unwrap();

    let paths: Vec<String> = folder.files_recursive().into_iter().map(|(p, _)| p).collect();
    assert_eq!(
        paths,
        vec![
            "package.json",
            "src/index.js",
            "src/style.css",
            "src/components/product-card.css",
            "src/components/product-card.js",
            "src/views/home.js",
            "src/views/blog/post.js",
            "public/index.html",
            "public/manifest.json",
        ]
    );

    let home = content(&folder, &["src", "views"], "home.js");
    assert!(home.contains("import ProductCard from '../components/product-card'"));
    assert!(home.contains("<Link to=\"/blog/post\">Blog</Link>"));

    let post = content(&folder, &["src", "views", "blog"], "post.js");
    assert!(post.contains("import ProductCard from '../../components/product-card'"));
    assert!(!post.contains("style.css"));

    let router = content(&folder, &["src"], "index.js");
    assert!(router.contains("import Home from './views/home'"));
    assert!(router.contains("import Post from './views/blog/post'"));
    assert!(router.contains("import './style.css'"));
    assert!(router.contains("<Route exact path=\"/\" component={Home} />"));
    assert!(router.contains("<Route path=\"/blog/post\" component={Post} />"));
    assert!(router.contains("import { Route, BrowserRouter as Router } from 'react-router-dom'"));

    let style = content(&folder, &["src"], "style.css");
    assert!(style.contains("--primary"));
    assert!(style.contains(".primary-button"));

    let entry = content(&folder, &["public"], "index.html");
    assert!(entry.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
    assert!(entry.contains("<title>Demo Shop</title>"));
    assert!(entry.contains("<link rel=\"manifest\" href=\"/manifest.json\">"));
    assert!(entry.contains("<div id=\"app\"></div>"));

    let manifest: serde_json::Value =
        serde_json::from_str(content(&folder, &["public"], "manifest.json")).unwrap();
    assert_eq!(manifest["theme_color"], "#822cec");
    assert_eq!(manifest["short_name"], "Demo Shop");

    let package: serde_json::Value =
        serde_json::from_str(content(&folder, &[], "package.json")).unwrap();
    assert_eq!(package["name"], "demo-shop");
    assert_eq!(package["dependencies"]["react"], "16.8.3");
    assert_eq!(package["dependencies"]["react-dom"], "16.8.3");
    assert_eq!(package["dependencies"]["react-router-dom"], "4.3.1");
}

#[tokio::test]
async fn test_html_project_inlines_components() {
    let generator = ProjectGenerator::new(html_strategy());
    let folder = generator
        .generate_project(&project(), GeneratedFolder::new("demo-shop"), None)
        .await
        .unwrap();

    let home = content(&folder, &[], "home.html");
    assert!(home.contains("<span class=\"span\">Product</span>"));
    assert!(home.contains("<link href=\"./product-card.css\" rel=\"stylesheet\">"));
    assert!(home.contains("<a href=\"/blog/post\">Blog</a>"));
    assert!(home.contains("<link href=\"./style.css\" rel=\"stylesheet\">"));
    assert!(!home.contains("ProductCard"));

    let post = content(&folder, &["blog"], "post.html");
    assert!(post.contains("<link href=\"../style.css\" rel=\"stylesheet\">"));
    assert!(post.contains("<link href=\"../product-card.css\" rel=\"stylesheet\">"));

    let card_style = content(&folder, &[], "product-card.css");
    assert!(card_style.contains(".span"));
    assert!(card_style.contains("font-weight: bold"));

    let package: serde_json::Value =
        serde_json::from_str(content(&folder, &[], "package.json")).unwrap();
    assert_eq!(package["dependencies"], serde_json::json!({}));
}

fn project_with_nested_card() -> ProjectUidl {
    let mut uidl = project();
    if let Some(card) = uidl.components.get_mut("ProductCard") {
        card.output_options.folder_path = segments(&["cards"]);
    }
    uidl
}

#[tokio::test]
async fn test_nested_component_imports_follow_placement() {
    let generator = ProjectGenerator::new(react_strategy());
    let folder = generator
        .generate_project(&project_with_nested_card(), GeneratedFolder::new("demo-shop"), None)
        .await
        .unwrap();

    let paths: Vec<String> = folder.files_recursive().into_iter().map(|(p, _)| p).collect();
    assert!(paths.contains(&"src/components/cards/product-card.js".to_string()));

    let home = content(&folder, &["src", "views"], "home.js");
    assert!(home.contains("import ProductCard from '../components/cards/product-card'"));

    let post = content(&folder, &["src", "views", "blog"], "post.js");
    assert!(post.contains("import ProductCard from '../../components/cards/product-card'"));
}

#[tokio::test]
async fn test_component_folders_are_imported_by_index() {
    let mut strategy = react_strategy();
    strategy.components.options.create_folder_for_each_component = true;
    let folder = ProjectGenerator::new(strategy)
        .generate_project(&project_with_nested_card(), GeneratedFolder::new("demo-shop"), None)
        .await
        .unwrap();

    content(&folder, &["src", "components", "cards", "product-card"], "index.js");
    let home = content(&folder, &["src", "views"], "home.js");
    assert!(home.contains("import ProductCard from '../components/cards/product-card/index'"));
}

#[tokio::test]
async fn test_html_links_nested_component_stylesheet() {
    let generator = ProjectGenerator::new(html_strategy());
    let folder = generator
        .generate_project(&project_with_nested_card(), GeneratedFolder::new("demo-shop"), None)
        .await
        .unwrap();

    content(&folder, &["cards"], "product-card.css");
    let home = content(&folder, &[], "home.html");
    assert!(home.contains("<link href=\"./cards/product-card.css\" rel=\"stylesheet\">"));
    let post = content(&folder, &["blog"], "post.html");
    assert!(post.contains("<link href=\"../cards/product-card.css\" rel=\"stylesheet\">"));
}

#[tokio::test]
async fn test_template_package_json_is_merged() {
    let mut template = GeneratedFolder::new("demo-shop");
    template.inject_files(
        &[],
        vec![GeneratedFile::new(
            "package",
            "json",
            r#"{"name":"template","scripts":{"start":"react-scripts start"},"dependencies":{"lodash":"4.17.21"}}"#,
        )],
    );

    let generator = ProjectGenerator::new(react_strategy());
    let folder = generator
        .generate_project(&project(), template, None)
        .await
        .unwrap();

    let package: serde_json::Value =
        serde_json::from_str(content(&folder, &[], "package.json")).unwrap();
    assert_eq!(package["name"], "demo-shop");
    assert_eq!(package["scripts"]["start"], "react-scripts start");
    assert_eq!(package["dependencies"]["lodash"], "4.17.21");
    assert_eq!(package["dependencies"]["react"], "16.8.3");
}

#[tokio::test]
async fn test_project_generation_is_deterministic() {
    let generator = ProjectGenerator::new(react_strategy());
    let uidl = project();
    let first = generator
        .generate_project(&uidl, GeneratedFolder::new("demo-shop"), None)
        .await
        .unwrap();
    let second = generator
        .generate_project(&uidl, GeneratedFolder::new("demo-shop"), None)
        .await
        .unwrap();
    assert_eq!(first, second);
}

fn framework_file(file_name: &str) -> FrameworkFileStrategy {
    FrameworkFileStrategy {
        generator: entry_file_generator(),
        path: Vec::new(),
        file_name: file_name.into(),
        content: Arc::new(|context: &FrameworkContext<'_>| -> uidlgen_lib::error::Result<FrameworkContent> {
            let stylesheet = context.global_stylesheet.clone().unwrap_or_default();
            let chunks: ChunkStore = vec![Chunk::text(
                "config",
                FileType::Js,
                format!("module.exports = {{ style: '{}' }}", stylesheet),
            )]
            .into_iter()
            .collect();
            let mut dependencies = BTreeMap::new();
            dependencies.insert("webpack".to_string(), "4.29.0".to_string());
            Ok(FrameworkContent {
                chunks,
                dependencies,
            })
        }),
        global_stylesheet_dependent: true,
    }
}

#[tokio::test]
async fn test_framework_config_file() {
    let mut strategy = react_strategy();
    strategy.framework = Some(FrameworkStrategy {
        config: Some(framework_file("app.config")),
        replace: None,
    });

    let folder = ProjectGenerator::new(strategy)
        .generate_project(&project(), GeneratedFolder::new("demo-shop"), None)
        .await
        .unwrap();

    assert_eq!(
        content(&folder, &[], "app.config.js"),
        "module.exports = { style: './src/style.css' }\n"
    );
    let package: serde_json::Value =
        serde_json::from_str(content(&folder, &[], "package.json")).unwrap();
    assert_eq!(package["dependencies"]["webpack"], "4.29.0");
}

#[tokio::test]
async fn test_framework_replace_requires_template_file() {
    let mut strategy = react_strategy();
    strategy.framework = Some(FrameworkStrategy {
        config: None,
        replace: Some(framework_file("next.config")),
    });

    let err = ProjectGenerator::new(strategy)
        .generate_project(&project(), GeneratedFolder::new("demo-shop"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::InvalidStrategy(_)));
}

#[tokio::test]
async fn test_invalid_uidl_is_rejected() {
    let mut uidl = project();
    uidl.name = "  ".into();
    let err = ProjectGenerator::new(react_strategy())
        .generate_project(&uidl, GeneratedFolder::new("demo-shop"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::InvalidUidl(_)));
}
