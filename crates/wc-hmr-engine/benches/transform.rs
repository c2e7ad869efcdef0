use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::path::Path;
use wc_hmr_engine::parser::{Lexer, Parser};
use wc_hmr_engine::{BaseClassDescriptor, HmrConfig, Transformer};

const ELEMENT: &str = r#"
import { LitElement, html, css } from 'lit-element';

export class MyCounter extends LitElement {
  static styles = css`:host { display: block; }`;
  static properties = { count: { type: Number } };

  constructor() {
    super();
    this.count = 0;
  }

  render() {
    return html`
      <button @click=${() => this.count++}>+</button>
      <span>${this.count}</span>
    `;
  }
}

customElements.define('my-counter', MyCounter);
"#;

fn large_module(classes: usize) -> String {
    let mut source = String::from("import { LitElement, html } from 'lit-element';\n");
    for i in 0..classes {
        source.push_str(&format!(
            r#"
const Mixin{i} = (Base) => class extends Base {{
  get label() {{ return `mixin-{i}`; }}
}};

export class Element{i} extends Mixin{i}(LitElement) {{
  render() {{
    return html`<p>${{this.label}} {i}</p>`;
  }}
}}
"#
        ));
    }
    source
}

fn transformer() -> Transformer {
    let config = HmrConfig::new("/app", vec![BaseClassDescriptor::lit_element()]).unwrap();
    Transformer::new(config)
}

fn bench_lexer(c: &mut Criterion) {
    c.bench_function("lex_element", |b| {
        b.iter(|| Lexer::new(black_box(ELEMENT)).tokenize().unwrap());
    });
}

fn bench_parser(c: &mut Criterion) {
    c.bench_function("parse_element", |b| {
        b.iter(|| Parser::new(black_box(ELEMENT)).unwrap().parse().unwrap());
    });
}

fn bench_transform(c: &mut Criterion) {
    let transformer = transformer();
    let path = Path::new("/app/src/my-counter.js");

    c.bench_function("transform_element", |b| {
        b.iter(|| transformer.transform(black_box(ELEMENT), path).unwrap());
    });

    let untouched = "export const add = (a, b) => a + b;\n".repeat(50);
    c.bench_function("transform_untouched", |b| {
        b.iter(|| transformer.transform(black_box(&untouched), path).unwrap());
    });
}

fn bench_large_module(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_module");
    let transformer = transformer();
    let path = Path::new("/app/src/elements.js");

    for classes in [10, 100] {
        let source = large_module(classes);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("classes", classes), &source, |b, source| {
            b.iter(|| transformer.transform(black_box(source), path).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lexer, bench_parser, bench_transform, bench_large_module);
criterion_main!(benches);
