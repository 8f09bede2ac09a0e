use common::Ulid;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{EmailAddress, Password, PasswordHash, User, UserId, UserName};

fn bench_ulid_random(c: &mut Criterion) {
    c.bench_function("domain/ulid_random", |b| {
        b.iter(Ulid::random);
    });
}

fn bench_ulid_parse(c: &mut Criterion) {
    let value = Ulid::random().value().to_string();

    c.bench_function("domain/ulid_parse", |b| {
        b.iter(|| Ulid::new(value.as_str()).unwrap());
    });
}

fn bench_password_validation(c: &mut Criterion) {
    c.bench_function("domain/password_validation", |b| {
        b.iter(|| Password::new("Abcdef1!").unwrap());
    });
}

fn bench_password_hash(c: &mut Criterion) {
    let password = Password::new("Abcdef1!").unwrap();

    c.bench_function("domain/password_hash", |b| {
        b.iter(|| PasswordHash::from_password(&password));
    });
}

fn bench_user_create(c: &mut Criterion) {
    let password = Password::new("Abcdef1!").unwrap();
    let hash = PasswordHash::from_password(&password);

    c.bench_function("domain/user_create", |b| {
        b.iter(|| {
            let mut user = User::create(
                UserId::random(),
                EmailAddress::new("bench@example.com").unwrap(),
                hash.clone(),
                UserName::new("Bench User").unwrap(),
            );
            user.pull_domain_events()
        });
    });
}

criterion_group!(
    benches,
    bench_ulid_random,
    bench_ulid_parse,
    bench_password_validation,
    bench_password_hash,
    bench_user_create
);
criterion_main!(benches);
